//! Thread selection and compose mode

use crate::models::ThreadId;

/// Exactly one of: nothing open, one thread open, or the new-thread form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    None,
    Thread(ThreadId),
    ComposingNew,
}

impl SelectionState {
    pub fn thread_id(&self) -> Option<&ThreadId> {
        match self {
            Self::Thread(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_composing(&self) -> bool {
        matches!(self, Self::ComposingNew)
    }

    /// Whether `thread_id` is the open thread
    pub fn is_thread(&self, thread_id: &ThreadId) -> bool {
        self.thread_id() == Some(thread_id)
    }
}

/// Owner of the [`SelectionState`]
#[derive(Debug, Default)]
pub struct ThreadSelectionController {
    state: SelectionState,
}

impl ThreadSelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Open a thread, leaving compose mode if it was active
    pub fn select_thread(&mut self, thread_id: ThreadId) {
        self.state = SelectionState::Thread(thread_id);
    }

    /// Open the new-thread form, closing any open thread
    pub fn begin_compose(&mut self) {
        self.state = SelectionState::ComposingNew;
    }

    /// Close the new-thread form; no-op unless composing
    pub fn cancel_compose(&mut self) {
        if self.state.is_composing() {
            self.state = SelectionState::None;
        }
    }

    /// Close the open thread; no-op unless a thread is open
    pub fn clear(&mut self) {
        if self.state.thread_id().is_some() {
            self.state = SelectionState::None;
        }
    }

    /// Reset on deal change, whatever the current state
    pub fn on_deal_changed(&mut self) {
        self.state = SelectionState::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_exits_compose() {
        let mut selection = ThreadSelectionController::new();
        selection.begin_compose();
        selection.select_thread(ThreadId::from(3));
        assert_eq!(selection.state(), &SelectionState::Thread(ThreadId::from(3)));
    }

    #[test]
    fn test_compose_replaces_thread() {
        let mut selection = ThreadSelectionController::new();
        selection.select_thread(ThreadId::from(3));
        selection.begin_compose();
        assert!(selection.state().is_composing());
        assert!(selection.state().thread_id().is_none());
    }

    #[test]
    fn test_cancel_compose_only_when_composing() {
        let mut selection = ThreadSelectionController::new();
        selection.select_thread(ThreadId::from(3));
        selection.cancel_compose();
        assert!(selection.state().is_thread(&ThreadId::from(3)));

        selection.begin_compose();
        selection.cancel_compose();
        assert_eq!(selection.state(), &SelectionState::None);
    }

    #[test]
    fn test_clear_leaves_compose_alone() {
        let mut selection = ThreadSelectionController::new();
        selection.begin_compose();
        selection.clear();
        assert!(selection.state().is_composing());

        selection.select_thread(ThreadId::from(1));
        selection.clear();
        assert_eq!(selection.state(), &SelectionState::None);
    }

    #[test]
    fn test_deal_change_resets_every_state() {
        let mut selection = ThreadSelectionController::new();
        let setups: [fn(&mut ThreadSelectionController); 3] = [
            |s| s.select_thread(ThreadId::from(1)),
            |s| s.begin_compose(),
            |_| {},
        ];
        for setup in setups {
            setup(&mut selection);
            selection.on_deal_changed();
            assert_eq!(selection.state(), &SelectionState::None);
        }
    }
}

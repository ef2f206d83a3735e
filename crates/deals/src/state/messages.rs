//! Messages of the selected thread

use log::debug;

use super::{LoadOutcome, SelectionState};
use crate::error::FetchError;
use crate::models::{Message, ThreadId};

/// Ticket for an in-flight message load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    pub thread_id: ThreadId,
}

/// Holds the messages of one thread, oldest first
#[derive(Debug, Default)]
pub struct MessageFetcher {
    thread_id: Option<ThreadId>,
    messages: Vec<Message>,
    pending: usize,
}

impl MessageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading messages for `thread_id`. Messages of a different
    /// thread are dropped right away.
    pub fn load_messages(&mut self, thread_id: ThreadId) -> MessageRequest {
        if self.thread_id.as_ref() != Some(&thread_id) {
            self.messages.clear();
            self.pending = 0;
            self.thread_id = Some(thread_id.clone());
        }
        self.pending += 1;
        debug!("Loading messages for thread {}", thread_id);
        MessageRequest { thread_id }
    }

    /// Apply a finished load.
    ///
    /// Only applied while `selection` still shows the requested thread;
    /// anything else is dropped without touching the current messages.
    pub fn apply_messages(
        &mut self,
        request: &MessageRequest,
        result: Result<Vec<Message>, FetchError>,
        selection: &SelectionState,
    ) -> Result<LoadOutcome, FetchError> {
        if !selection.is_thread(&request.thread_id)
            || self.thread_id.as_ref() != Some(&request.thread_id)
        {
            debug!("Discarding stale messages for thread {}", request.thread_id);
            return Ok(LoadOutcome::Stale);
        }
        self.pending = self.pending.saturating_sub(1);

        let mut messages = result?;
        Message::sort_for_display(&mut messages);
        self.messages = messages;
        Ok(LoadOutcome::Applied(self.messages.len()))
    }

    /// Forget the target and its messages
    pub fn clear(&mut self) {
        self.thread_id = None;
        self.messages.clear();
        self.pending = 0;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.thread_id.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }
}

//! The single source of truth for the current deal

use log::info;

use crate::models::{Deal, DealId};

/// Notification emitted when the current deal id actually changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealChange {
    pub previous: Option<DealId>,
    pub current: DealId,
}

/// Holds the currently selected deal
#[derive(Debug, Default)]
pub struct DealContext {
    current: Option<Deal>,
}

impl DealContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current deal.
    ///
    /// Change detection is by id: a re-fetched copy of the same deal
    /// refreshes the held value but emits no notification.
    pub fn set_current_deal(&mut self, deal: Deal) -> Option<DealChange> {
        let previous = self.current.as_ref().map(|d| d.id.clone());
        if previous.as_ref() == Some(&deal.id) {
            self.current = Some(deal);
            return None;
        }

        info!("Switching to deal {} ({})", deal.id, deal.display_name());
        let change = DealChange {
            previous,
            current: deal.id.clone(),
        };
        self.current = Some(deal);
        Some(change)
    }

    /// The current deal, or `None` before one has been chosen
    pub fn current_deal(&self) -> Option<&Deal> {
        self.current.as_ref()
    }

    pub fn current_deal_id(&self) -> Option<&DealId> {
        self.current.as_ref().map(|d| &d.id)
    }

    /// Whether `deal_id` is the current deal
    pub fn is_current(&self, deal_id: &DealId) -> bool {
        self.current_deal_id() == Some(deal_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_before_first_deal() {
        let context = DealContext::new();
        assert!(context.current_deal().is_none());
    }

    #[test]
    fn test_first_deal_emits_change() {
        let mut context = DealContext::new();
        let change = context.set_current_deal(Deal::new("1", "Acme")).unwrap();
        assert_eq!(change.previous, None);
        assert_eq!(change.current, DealId::from(1));
    }

    #[test]
    fn test_same_id_is_silent_but_refreshes() {
        let mut context = DealContext::new();
        context.set_current_deal(Deal::new("1", "Acme"));

        assert!(context.set_current_deal(Deal::new("1", "Acme Corp")).is_none());
        assert_eq!(context.current_deal().unwrap().deal_name, "Acme Corp");
    }

    #[test]
    fn test_switch_reports_previous() {
        let mut context = DealContext::new();
        context.set_current_deal(Deal::new("1", "Acme"));

        let change = context.set_current_deal(Deal::new("2", "Globex")).unwrap();
        assert_eq!(change.previous, Some(DealId::from(1)));
        assert!(context.is_current(&DealId::from(2)));
    }
}

//! Thread model: a named conversation belonging to one deal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DealId, Message, ThreadId};

/// Placeholder shown for a thread without a subject
pub const NO_SUBJECT: &str = "No subject";

/// A conversation scoped to a single deal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    /// Owning deal. Filled from the request scope when the backend omits it.
    pub deal_id: Option<DealId>,
    pub subject: String,
    /// Timestamp of the most recent message, if known
    pub last_message_date: Option<DateTime<Utc>>,
    /// Embedded messages; `None` when the backend sends threads lazily
    pub messages: Option<Vec<Message>>,
}

impl Thread {
    pub fn new(
        id: impl Into<ThreadId>,
        deal_id: impl Into<DealId>,
        subject: impl Into<String>,
        last_message_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            deal_id: Some(deal_id.into()),
            subject: subject.into(),
            last_message_date,
            messages: None,
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Whether the thread is scoped to `deal_id`
    pub fn belongs_to(&self, deal_id: &DealId) -> bool {
        self.deal_id.as_ref() == Some(deal_id)
    }

    /// Subject with the [`NO_SUBJECT`] placeholder
    pub fn subject_or_placeholder(&self) -> &str {
        if self.subject.trim().is_empty() {
            NO_SUBJECT
        } else {
            &self.subject
        }
    }

    /// Sort most recently active first. Stable; undated threads go last.
    pub fn sort_by_recency(threads: &mut [Thread]) {
        threads.sort_by(|a, b| match (a.last_message_date, b.last_message_date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 9, day, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_sort_by_recency() {
        let mut threads = vec![
            Thread::new("old", "1", "Old", at(1)),
            Thread::new("undated", "1", "Undated", None),
            Thread::new("new", "1", "New", at(20)),
            Thread::new("mid", "1", "Mid", at(10)),
        ];

        Thread::sort_by_recency(&mut threads);
        let ids: Vec<&str> = threads.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old", "undated"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut threads = vec![
            Thread::new("first", "1", "A", at(5)),
            Thread::new("second", "1", "B", at(5)),
        ];

        Thread::sort_by_recency(&mut threads);
        assert_eq!(threads[0].id.as_str(), "first");
    }

    #[test]
    fn test_belongs_to() {
        let thread = Thread::new("t1", "4", "Kickoff", None);
        assert!(thread.belongs_to(&DealId::from(4)));
        assert!(!thread.belongs_to(&DealId::from(5)));
    }
}

//! Message model: one entry in a deal thread

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MessageId, ThreadId};

/// Label shown when a message carries no usable sender name
pub const UNKNOWN_SENDER: &str = "Unknown Sender";

/// Avatar initial used when no sender name is available
pub const FALLBACK_INITIAL: char = 'U';

/// Placeholder shown for a message without content
pub const NO_CONTENT: &str = "No content available";

/// Who wrote a message, in whichever shape the backend supplied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// Structured `first_name` / `last_name` pair (either may be blank)
    Person { first_name: String, last_name: String },
    /// A single preformatted `sender_name`
    Named(String),
    Unknown,
}

impl Sender {
    /// Build a sender from the optional wire fields.
    ///
    /// A non-blank first/last name pair wins over `sender_name`.
    pub fn from_parts(
        first_name: Option<String>,
        last_name: Option<String>,
        sender_name: Option<String>,
    ) -> Self {
        let first_name = first_name.unwrap_or_default();
        let last_name = last_name.unwrap_or_default();
        if !first_name.trim().is_empty() || !last_name.trim().is_empty() {
            return Self::Person {
                first_name,
                last_name,
            };
        }
        match sender_name {
            Some(name) if !name.trim().is_empty() => Self::Named(name),
            _ => Self::Unknown,
        }
    }

    /// Display name used for searching: `first_name + " " + last_name`, or `sender_name`
    pub fn display_name(&self) -> Option<String> {
        match self {
            Self::Person {
                first_name,
                last_name,
            } => {
                let full = format!("{} {}", first_name.trim(), last_name.trim());
                let full = full.trim();
                (!full.is_empty()).then(|| full.to_string())
            }
            Self::Named(name) => Some(name.trim().to_string()),
            Self::Unknown => None,
        }
    }

    /// Display name with the [`UNKNOWN_SENDER`] fallback
    pub fn label(&self) -> String {
        self.display_name()
            .unwrap_or_else(|| UNKNOWN_SENDER.to_string())
    }

    /// First letter of the sender's first name, or [`FALLBACK_INITIAL`]
    pub fn avatar_initial(&self) -> char {
        let source = match self {
            Self::Person { first_name, .. } => first_name.trim(),
            Self::Named(name) => name.trim(),
            Self::Unknown => "",
        };
        source.chars().next().unwrap_or(FALLBACK_INITIAL)
    }
}

/// A single message within a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Owning thread, when the backend reports it
    pub thread_id: Option<ThreadId>,
    pub content: String,
    pub sender: Sender,
    /// `None` when the backend sent no parseable timestamp
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new message builder
    pub fn builder(id: impl Into<MessageId>) -> MessageBuilder {
        MessageBuilder::new(id.into())
    }

    /// Content with the [`NO_CONTENT`] placeholder for empty bodies
    pub fn content_or_placeholder(&self) -> &str {
        if self.content.trim().is_empty() {
            NO_CONTENT
        } else {
            &self.content
        }
    }

    /// Sort messages for display: oldest first, undated messages leading
    pub fn sort_for_display(messages: &mut [Message]) {
        messages.sort_by_key(|m| m.created_at);
    }
}

/// Builder for creating Message instances
pub struct MessageBuilder {
    id: MessageId,
    thread_id: Option<ThreadId>,
    content: String,
    sender: Sender,
    created_at: Option<DateTime<Utc>>,
}

impl MessageBuilder {
    fn new(id: MessageId) -> Self {
        Self {
            id,
            thread_id: None,
            content: String::new(),
            sender: Sender::Unknown,
            created_at: None,
        }
    }

    pub fn thread_id(mut self, thread_id: impl Into<ThreadId>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender = Sender::Named(name.into());
        self
    }

    pub fn person(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.sender = Sender::Person {
            first_name: first_name.into(),
            last_name: last_name.into(),
        };
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn build(self) -> Message {
        Message {
            id: self.id,
            thread_id: self.thread_id,
            content: self.content,
            sender: self.sender,
            created_at: self.created_at,
        }
    }
}

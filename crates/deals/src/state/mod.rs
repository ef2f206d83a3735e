//! Conversation state owners
//!
//! Each component owns and mutates only its own state. The
//! [`DealWorkspace`](crate::workspace::DealWorkspace) routes notifications
//! and completions between them.

mod compose;
mod deal_context;
mod messages;
mod selection;
mod thread_list;

pub use compose::{CreateThreadRequest, NewThreadWorkflow};
pub use deal_context::{DealChange, DealContext};
pub use messages::{MessageFetcher, MessageRequest};
pub use selection::{SelectionState, ThreadSelectionController};
pub use thread_list::{ThreadListCache, ThreadListRequest};

/// What happened to a completion handed back to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result was applied; carries the number of items now held
    Applied(usize),
    /// The target no longer matches the live selection; nothing changed
    Stale,
}

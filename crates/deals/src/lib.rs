//! Deals crate - Business logic for deal-scoped conversations
//!
//! This crate provides the conversation engine behind a deal room:
//! - Domain models (Deal, Thread, Message, User)
//! - Collaboration backend HTTP client and bearer-token storage
//! - Backend trait with an in-memory implementation
//! - Per-deal state owners (deal context, thread list, selection,
//!   messages, new-thread form) and the workspace that wires them
//! - A session runtime running backend calls on worker threads
//!
//! This crate has no UI dependencies. Results that arrive after the user
//! has moved on are dropped rather than shown.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod session;
pub mod state;
pub mod workspace;

pub use crate::api::{CollabClient, NewThread, TokenStore};
pub use crate::backend::{Backend, InMemoryBackend};
pub use crate::config::ClientConfig;
pub use crate::error::{DealsError, FetchError, ValidationError};
pub use crate::models::{
    Deal, DealId, Message, MessageId, NO_CONTENT, NO_SUBJECT, Sender, Thread, ThreadId,
    UNKNOWN_SENDER, User,
};
pub use crate::session::Session;
pub use crate::state::{LoadOutcome, SelectionState};
pub use crate::workspace::{Completion, DealWorkspace, Request};

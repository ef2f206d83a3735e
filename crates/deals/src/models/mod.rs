//! Domain models for deal-scoped conversations

mod deal;
mod id;
mod message;
mod thread;
mod user;

pub use deal::{Deal, DealId};
pub use id::{MessageId, ThreadId};
pub use message::{FALLBACK_INITIAL, Message, MessageBuilder, NO_CONTENT, Sender, UNKNOWN_SENDER};
pub use thread::{NO_SUBJECT, Thread};
pub use user::User;

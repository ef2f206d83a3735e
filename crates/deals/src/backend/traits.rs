//! Backend trait definition

use crate::api::NewThread;
use crate::error::FetchError;
use crate::models::{Deal, DealId, Message, Thread, ThreadId};

/// Remote operations consumed by the conversation engine
///
/// Calls block until the backend answers; the session runtime runs them on
/// worker threads. Every call fails with [`FetchError::Unauthorized`] when
/// no valid credential is available.
pub trait Backend: Send + Sync {
    /// Deals visible to the signed-in user
    fn list_deals(&self) -> Result<Vec<Deal>, FetchError>;

    /// Threads for one deal; `NotFound` if the deal does not exist
    fn list_threads(&self, deal_id: &DealId) -> Result<Vec<Thread>, FetchError>;

    /// Messages for one thread
    fn list_messages(&self, thread_id: &ThreadId) -> Result<Vec<Message>, FetchError>;

    /// Create a thread with its first message; the returned id is server-assigned
    fn create_thread(&self, new_thread: &NewThread) -> Result<Thread, FetchError>;
}

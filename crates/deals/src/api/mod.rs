//! Collaboration backend integration
//!
//! This module provides:
//! - Wire types for the backend's JSON payloads
//! - Bearer-token storage and the login flow
//! - A blocking HTTP client implementing [`Backend`](crate::backend::Backend)
//! - Normalization of payloads into domain models

mod auth;
mod client;
mod normalize;

pub use auth::TokenStore;
pub use client::CollabClient;
pub use normalize::{normalize_message, normalize_thread, parse_timestamp};
pub use wire::NewThread;

/// Backend wire types
pub mod wire {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use crate::models::{DealId, MessageId, ThreadId};

    /// Thread as returned by `GET /deals/{id}/threads` and `POST /threads`
    #[derive(Debug, Deserialize)]
    pub struct ThreadPayload {
        pub id: ThreadId,
        #[serde(default)]
        pub deal_id: Option<DealId>,
        #[serde(default)]
        pub subject: Option<String>,
        /// String in one of several date formats, or epoch seconds/millis
        #[serde(default)]
        pub last_message_date: Option<Value>,
        #[serde(default)]
        pub messages: Option<Vec<MessagePayload>>,
    }

    /// Message as returned by `GET /threads/{id}/messages` or embedded in a thread
    #[derive(Debug, Deserialize)]
    pub struct MessagePayload {
        pub id: MessageId,
        #[serde(default)]
        pub thread_id: Option<ThreadId>,
        #[serde(default)]
        pub content: Option<String>,
        #[serde(default)]
        pub sender_name: Option<String>,
        #[serde(default)]
        pub first_name: Option<String>,
        #[serde(default)]
        pub last_name: Option<String>,
        #[serde(default)]
        pub created_at: Option<Value>,
    }

    /// Body of `POST /threads`
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NewThread {
        pub subject: String,
        #[serde(rename = "initialMessage")]
        pub initial_message: String,
        pub deal_id: DealId,
    }

    /// Body of `POST /login`
    #[derive(Debug, Serialize)]
    pub struct LoginRequest<'a> {
        pub email: &'a str,
        pub password: &'a str,
    }

    /// Response from `POST /login`
    #[derive(Debug, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
    }
}

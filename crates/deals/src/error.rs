//! Error types for deal-scoped conversation operations

/// A backend call failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Missing or rejected credential; the user must sign in again
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Network failure, unexpected status, or an undecodable body
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Whether the caller should force re-authentication
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// User input rejected before any request was made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Thread subject must not be empty")]
    EmptySubject,

    #[error("Initial message must not be empty")]
    EmptyMessage,

    #[error("Select a deal before creating a thread")]
    NoDealSelected,

    #[error("A new thread is already being created")]
    SubmitInFlight,
}

/// Any error surfaced by the deals crate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DealsError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DealsError {
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.requires_reauth())
    }
}

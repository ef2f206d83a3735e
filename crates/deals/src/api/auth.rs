//! Bearer-token storage
//!
//! The backend issues a bearer token from `POST /login`. It is kept as a
//! small JSON document (~/.config/dealroom/session.json) so every command
//! run can reuse it until the user signs out.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Session filename in the Dealroom config directory
const SESSION_FILE: &str = "session.json";

/// Stored token data
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    saved_at: DateTime<Utc>,
}

/// File-backed storage for the bearer token
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store the token at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the token in the Dealroom config directory
    pub fn default_location() -> Result<Self> {
        let path = config::config_path(SESSION_FILE).context("Could not determine config directory")?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored token, if any. Blank tokens count as absent.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let session: StoredSession = config::load_json_file(&self.path)?;
        let token = session.token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    /// Persist a freshly issued token, replacing any previous one
    pub fn save(&self, token: &str) -> Result<()> {
        let session = StoredSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        config::save_json_file(&self.path, &session)
    }

    /// Forget the stored token. Returns whether one was present.
    pub fn clear(&self) -> Result<bool> {
        config::remove_file(&self.path)
    }
}

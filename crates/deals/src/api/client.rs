//! Collaboration backend HTTP client
//!
//! Blocking HTTP (ureq) keeps the client executor-agnostic; the session
//! runtime decides which thread a call runs on.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::TokenStore;
use super::normalize::{normalize_message, normalize_thread};
use super::wire::{LoginRequest, LoginResponse, MessagePayload, NewThread, ThreadPayload};
use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::models::{Deal, DealId, Message, Thread, ThreadId, User};

/// HTTP client for the deal collaboration backend
pub struct CollabClient {
    agent: ureq::Agent,
    config: ClientConfig,
    tokens: TokenStore,
}

impl CollabClient {
    /// Create a new client
    pub fn new(config: ClientConfig, tokens: TokenStore) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Self {
            agent: agent_config.into(),
            config,
            tokens,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a bearer token is stored (it may still be expired server-side)
    pub fn has_token(&self) -> bool {
        matches!(self.tokens.load(), Ok(Some(_)))
    }

    /// Exchange credentials for a bearer token and store it
    pub fn login(&self, email: &str, password: &str) -> Result<()> {
        let url = self.config.endpoint("/login");
        debug!("POST {}", url);

        let mut response = self
            .agent
            .post(&url)
            .send_json(&LoginRequest { email, password })
            .map_err(|e| map_error(e, "login"))?;

        let login: LoginResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| FetchError::transport(format!("Failed to parse login response: {}", e)))?;

        self.tokens
            .save(&login.token)
            .context("Failed to store session token")?;
        info!("Signed in as {}", email);
        Ok(())
    }

    /// Forget the stored token. Returns whether one was present.
    pub fn logout(&self) -> Result<bool> {
        self.tokens.clear()
    }

    /// Profile of the signed-in user
    pub fn current_user(&self) -> Result<User, FetchError> {
        self.get_json("/user", "user")
    }

    /// Stored bearer token; a missing or unreadable token is `Unauthorized`
    fn bearer(&self) -> Result<String, FetchError> {
        match self.tokens.load() {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(FetchError::Unauthorized),
            Err(e) => {
                debug!("Session token unreadable: {:#}", e);
                Err(FetchError::Unauthorized)
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T, FetchError> {
        let token = self.bearer()?;
        let url = self.config.endpoint(path);
        debug!("GET {}", url);

        let mut response = self
            .agent
            .get(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .call()
            .map_err(|e| map_error(e, resource))?;

        response
            .body_mut()
            .read_json()
            .map_err(|e| FetchError::transport(format!("Failed to parse {} response: {}", resource, e)))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        resource: &str,
    ) -> Result<T, FetchError> {
        let token = self.bearer()?;
        let url = self.config.endpoint(path);
        debug!("POST {}", url);

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .send_json(body)
            .map_err(|e| map_error(e, resource))?;

        response
            .body_mut()
            .read_json()
            .map_err(|e| FetchError::transport(format!("Failed to parse {} response: {}", resource, e)))
    }
}

impl Backend for CollabClient {
    fn list_deals(&self) -> Result<Vec<Deal>, FetchError> {
        self.get_json("/deals", "deals")
    }

    fn list_threads(&self, deal_id: &DealId) -> Result<Vec<Thread>, FetchError> {
        let path = format!("/deals/{}/threads", urlencoding::encode(deal_id.as_str()));
        let payloads: Vec<ThreadPayload> = self.get_json(&path, &format!("deal {}", deal_id))?;
        Ok(payloads.into_iter().map(normalize_thread).collect())
    }

    fn list_messages(&self, thread_id: &ThreadId) -> Result<Vec<Message>, FetchError> {
        let path = format!("/threads/{}/messages", urlencoding::encode(thread_id.as_str()));
        // A null body means "no messages"
        let payloads: Option<Vec<MessagePayload>> =
            self.get_json(&path, &format!("thread {}", thread_id))?;
        Ok(payloads
            .unwrap_or_default()
            .into_iter()
            .map(normalize_message)
            .collect())
    }

    fn create_thread(&self, new_thread: &NewThread) -> Result<Thread, FetchError> {
        let payload: ThreadPayload = self.post_json("/threads", new_thread, "thread")?;
        Ok(normalize_thread(payload))
    }
}

/// Map a ureq failure onto the fetch error taxonomy
fn map_error(error: ureq::Error, resource: &str) -> FetchError {
    match error {
        ureq::Error::StatusCode(401 | 403) => FetchError::Unauthorized,
        ureq::Error::StatusCode(404) => FetchError::not_found(resource),
        ureq::Error::StatusCode(code) => {
            FetchError::transport(format!("{} request failed with HTTP {}", resource, code))
        }
        other => FetchError::transport(format!("{} request failed: {}", resource, other)),
    }
}

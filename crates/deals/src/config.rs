//! Client configuration for the collaboration backend
//!
//! Settings are resolved per field, in order of priority:
//! 1. Environment variables (`DEALROOM_BASE_URL`, `DEALROOM_TIMEOUT_SECS`)
//! 2. JSON file (~/.config/dealroom/client.json)
//! 3. Built-in defaults

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Config filename in the Dealroom config directory
const CLIENT_CONFIG_FILE: &str = "client.json";

const BASE_URL_ENV: &str = "DEALROOM_BASE_URL";
const TIMEOUT_ENV: &str = "DEALROOM_TIMEOUT_SECS";

/// Backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Per-request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the collaboration backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Validated http(s) base URL without a trailing slash
    base_url: String,
    pub timeout_secs: u64,
}

/// On-disk shape of client.json; every field optional
#[derive(Debug, Default, Deserialize)]
struct ClientConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Resolve configuration from environment, config file and defaults
    pub fn load() -> Result<Self> {
        let mut resolved = Self::default();

        if config::config_exists(CLIENT_CONFIG_FILE) {
            let file: ClientConfigFile = config::load_json(CLIENT_CONFIG_FILE)?;
            resolved = resolved.merge_file(file)?;
        }

        resolved.merge_env()
    }

    /// Load configuration from a specific JSON file (defaults fill the gaps)
    pub fn from_file(path: &Path) -> Result<Self> {
        let file: ClientConfigFile = config::load_json_file(path)?;
        Self::default().merge_file(file)
    }

    /// Parse configuration from a JSON string (defaults fill the gaps)
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ClientConfigFile =
            serde_json::from_str(json).context("Failed to parse client config JSON")?;
        Self::default().merge_file(file)
    }

    /// Replace the base URL after validating it
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/deals`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Get the default config file path (~/.config/dealroom/client.json)
    pub fn default_config_path() -> Option<PathBuf> {
        config::config_path(CLIENT_CONFIG_FILE)
    }

    fn merge_file(mut self, file: ClientConfigFile) -> Result<Self> {
        if let Some(base_url) = file.base_url {
            self = self.with_base_url(&base_url)?;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        Ok(self)
    }

    fn merge_env(mut self) -> Result<Self> {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            self = self
                .with_base_url(&base_url)
                .with_context(|| format!("{} is not a valid URL", BASE_URL_ENV))?;
        }
        if let Ok(timeout) = std::env::var(TIMEOUT_ENV) {
            self.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_ENV))?;
        }
        Ok(self)
    }
}

/// Validate an http(s) URL and strip any trailing slash
fn normalize_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid base URL: {}", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Base URL must use http or https: {}", raw);
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:5001");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClientConfig::from_json(r#"{ "timeout_secs": 5 }"#).unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_base_url_normalized() {
        let config = ClientConfig::from_json(r#"{ "base_url": "https://crm.example.com/api/" }"#)
            .unwrap();
        assert_eq!(config.base_url(), "https://crm.example.com/api");
        assert_eq!(
            config.endpoint("/deals/3/threads"),
            "https://crm.example.com/api/deals/3/threads"
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(ClientConfig::from_json(r#"{ "base_url": "ftp://crm.example.com" }"#).is_err());
        assert!(ClientConfig::from_json(r#"{ "base_url": "not a url" }"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("client.json");
        std::fs::write(&path, r#"{ "base_url": "http://127.0.0.1:9000" }"#).unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.endpoint("threads"), "http://127.0.0.1:9000/threads");
    }
}

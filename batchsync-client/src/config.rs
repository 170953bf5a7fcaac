//! Remote store configuration.
//!
//! The endpoint and credentials come from the environment; there is no
//! config file. `BATCHSYNC_API_URL` defaults to the public batch API,
//! `BATCHSYNC_API_KEY` is required.

use std::time::Duration;

use crate::error::ClientError;

pub const API_URL_VAR: &str = "BATCHSYNC_API_URL";
pub const API_KEY_VAR: &str = "BATCHSYNC_API_KEY";

const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`crate::RemoteStore`].
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the remote API, without a trailing slash.
    pub base_url: String,
    /// Bearer token sent on every request.
    pub api_key: String,
    /// Per-call timeout applied by the HTTP client.
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build a config from `BATCHSYNC_API_URL` / `BATCHSYNC_API_KEY`.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url =
            std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_key =
            std::env::var(API_KEY_VAR).map_err(|_| ClientError::MissingApiKey(API_KEY_VAR))?;
        Ok(Self::new(base_url, api_key))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = RemoteConfig::new("https://example.test/v1/", "sk-test");
        assert_eq!(config.base_url, "https://example.test/v1");
    }

    #[test]
    fn default_timeout_applies() {
        let config = RemoteConfig::new("https://example.test", "sk-test");
        assert_eq!(config.timeout, Duration::from_secs(30));
        let faster = config.with_timeout(Duration::from_secs(5));
        assert_eq!(faster.timeout, Duration::from_secs(5));
    }
}

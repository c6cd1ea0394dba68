//! Client configuration

use std::time::Duration;

/// Base URL used when neither the environment nor settings provide one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable holding the backend base URL
pub const BASE_URL_ENV: &str = "TABULA_API_BASE_URL";

/// Connection settings for the REST backend
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL including the API prefix, e.g. `http://localhost:8000/api`
    pub base_url: String,
    /// Request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Read the base URL from [`BASE_URL_ENV`], falling back to the default
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

//! Error types for backend communication

use thiserror::Error;

/// Errors raised while talking to the REST backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The backend answered with a non-2xx status.
    /// `detail` is the `{detail: string}` body field when present.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("request failed"))]
    Http { status: u16, detail: Option<String> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// The message shown to the user.
    ///
    /// The backend's `detail` is surfaced verbatim. Without one, transport and
    /// decode failures show their own message and anything else falls back to
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BackendError::Http {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            BackendError::Http { .. } => fallback.to_string(),
            BackendError::Transport(msg) | BackendError::Decode(msg) | BackendError::InvalidUrl(msg) => {
                if msg.is_empty() {
                    fallback.to_string()
                } else {
                    msg.clone()
                }
            }
        }
    }
}

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

//! Shared reqwest transport: URL building and `{detail}` error decoding

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Instant;
use tabula_core::{BackendError, Result};
use url::Url;

use crate::ClientConfig;

/// Error body returned by the backend on non-2xx responses
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Extract `detail` from an error body. Non-string details (e.g. validation
/// error lists) are rendered as compact JSON.
pub(crate) fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    base_url: Url,
    client: Client,
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so table names cannot escape their path position.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON success body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(method = %method, url = %url, "sending request");
        let started = Instant::now();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "response received"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = parse_detail(&body);
            tracing::warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "backend returned an error"
            );
            return Err(BackendError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

//! Remote API client error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for remote API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised while talking to the Minecraft REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server could not be reached (refused, DNS, reset).
    #[error("cannot connect to Minecraft server: {0}")]
    Connect(String),

    /// The request did not complete within its timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Any other transport-level failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The body of a 2xx response could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// A request body could not be serialized.
    #[error("could not encode request: {0}")]
    Encode(String),

    /// Structure data was not valid base64.
    #[error("Invalid base64 data: {0}")]
    InvalidEncoding(String),

    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Client(String),
}

impl ApiError {
    /// Build a status error, preferring the `error` field of a JSON body.
    pub fn status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());

        Self::Status { status, detail }
    }

    /// Map a reqwest failure onto the connectivity taxonomy.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        // The URL may carry credentials.
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                detail: err.to_string(),
            }
        } else {
            Self::Request(err.to_string())
        }
    }

    /// Whether this error means the server was never reached or never answered.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::Connect(_) | Self::Timeout(_) | Self::Status { .. } | Self::Request(_)
        )
    }
}

//! Tool-specific error types.
//!
//! Every failure a tool can report maps to exactly one [`ErrorTier`], so the
//! server (and tests) can tell an offline server apart from a refused
//! operation or a bad argument without inspecting message text.

use thiserror::Error;

use crate::domains::minecraft::{ApiError, RemoteReply};

/// Result type returned by tool handlers: the success text or an error.
pub type ToolResult<T = String> = Result<T, ToolError>;

/// The broad class a tool failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTier {
    /// The server could not be reached, timed out or answered non-2xx.
    Connectivity,
    /// The server was reached but declined or garbled the operation.
    Remote,
    /// The arguments were rejected before any network call.
    Validation,
    /// A bug on our side.
    Internal,
}

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// The tool is a retired alias that only points at its replacements.
    #[error("{0}")]
    Deprecated(&'static str),

    /// Arguments did not match the tool's schema.
    #[error("❌ Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Arguments were well-formed but violate a tool rule.
    #[error("❌ {0}")]
    Validation(String),

    /// Structure data was not valid base64.
    #[error("❌ Invalid base64 data: {0}")]
    InvalidEncoding(String),

    /// The server answered `success: false`.
    #[error("❌ Failed to {operation}: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    /// The server could not be reached or did not answer in time.
    #[error("{}", connectivity_message(.operation, .source))]
    Connectivity {
        operation: &'static str,
        #[source]
        source: ApiError,
    },

    /// A 2xx body that could not be understood.
    #[error("❌ Failed to {operation}: unexpected response from server ({message})")]
    UnexpectedResponse {
        operation: &'static str,
        message: String,
    },

    /// An internal error occurred.
    #[error("❌ Internal error: {0}")]
    Internal(String),
}

fn connectivity_message(operation: &str, source: &ApiError) -> String {
    match source {
        ApiError::Connect(_) => format!(
            "❌ Cannot connect to Minecraft server - server is OFFLINE or not running (while trying to {operation})"
        ),
        ApiError::Timeout(after) => format!(
            "❌ Connection to Minecraft server timed out after {after:?} (while trying to {operation})"
        ),
        ApiError::Status { status, detail } if detail.is_empty() => {
            format!("❌ Failed to {operation}: HTTP {status}")
        }
        ApiError::Status { status, detail } => {
            format!("❌ Failed to {operation}: HTTP {status} - {detail}")
        }
        other => format!("❌ Failed to {operation}: {other}"),
    }
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classify a client error raised while performing `operation`.
    pub fn api(operation: &'static str, err: ApiError) -> Self {
        match err {
            ApiError::InvalidEncoding(msg) => Self::InvalidEncoding(msg),
            ApiError::Decode(message) => Self::UnexpectedResponse { operation, message },
            ApiError::Encode(msg) | ApiError::Client(msg) => Self::Internal(msg),
            source => Self::Connectivity { operation, source },
        }
    }

    /// The tier this error belongs to.
    pub fn tier(&self) -> ErrorTier {
        match self {
            Self::Connectivity { .. } => ErrorTier::Connectivity,
            Self::Remote { .. } | Self::UnexpectedResponse { .. } => ErrorTier::Remote,
            Self::NotFound(_)
            | Self::Deprecated(_)
            | Self::InvalidArguments(_)
            | Self::Validation(_)
            | Self::InvalidEncoding(_) => ErrorTier::Validation,
            Self::Internal(_) => ErrorTier::Internal,
        }
    }
}

/// Attach an operation name to client results.
pub trait ApiResultExt<T> {
    fn during(self, operation: &'static str) -> ToolResult<T>;
}

impl<T> ApiResultExt<T> for Result<T, ApiError> {
    fn during(self, operation: &'static str) -> ToolResult<T> {
        self.map_err(|e| ToolError::api(operation, e))
    }
}

/// Unwrap a reply that must carry `success: true`.
pub fn require_success(reply: RemoteReply, operation: &'static str) -> ToolResult<serde_json::Value> {
    if reply.is_success() {
        Ok(reply.into_payload())
    } else {
        Err(ToolError::Remote {
            operation,
            message: reply.error_message(),
        })
    }
}

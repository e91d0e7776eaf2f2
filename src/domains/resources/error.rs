//! Errors raised while serving resources.

use thiserror::Error;

/// Failure to serve a resource read.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No resource is published under `uri`.
    #[error("Unknown resource '{uri}'. Available: {}", available.join(", "))]
    UnknownUri { uri: String, available: Vec<String> },
}

impl ResourceError {
    pub fn unknown_uri<I, S>(uri: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UnknownUri {
            uri: uri.into(),
            available: available.into_iter().map(Into::into).collect(),
        }
    }

    /// URIs a client can read instead.
    pub fn available(&self) -> &[String] {
        match self {
            Self::UnknownUri { available, .. } => available,
        }
    }
}

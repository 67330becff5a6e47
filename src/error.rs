//! Error taxonomy for the analysis client.
//!
//! The transport layer classifies failures into [`GreenCodeError`]; the
//! orchestrator is the only place that turns them into user-facing
//! [`ErrorInfo`] snapshots.

use serde::Serialize;
use thiserror::Error;

/// Result type alias used across the library.
pub type Result<T> = std::result::Result<T, GreenCodeError>;

/// Failures surfaced by the client and orchestrator.
///
/// All variants carry owned strings so the error can be cloned into
/// request state and broadcast to display surfaces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GreenCodeError {
    /// Input rejected locally, never sent over the wire.
    #[error("{0}")]
    Validation(String),

    #[error("Request timeout: the server took longer than {timeout_ms} ms to respond")]
    Timeout { timeout_ms: u64 },

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("API is unreachable: {0}")]
    Network(String),

    #[error("Invalid response data received: {0}")]
    MalformedResponse(String),

    #[error("Failed to clear model cache: {0}")]
    CacheClear(Box<GreenCodeError>),
}

/// Field-free classification of a [`GreenCodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Timeout,
    Http,
    Network,
    MalformedResponse,
    CacheClear,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Timeout => write!(f, "timeout"),
            Self::Http => write!(f, "http"),
            Self::Network => write!(f, "network"),
            Self::MalformedResponse => write!(f, "malformed_response"),
            Self::CacheClear => write!(f, "cache_clear"),
        }
    }
}

impl GreenCodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Http { .. } => ErrorKind::Http,
            Self::Network(_) => ErrorKind::Network,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::CacheClear(_) => ErrorKind::CacheClear,
        }
    }

    /// HTTP status code, when the failure came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::CacheClear(inner) => inner.status(),
            _ => None,
        }
    }
}

/// User-facing snapshot of a failed attempt.
///
/// This is what display surfaces see; raw transport errors never reach them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

impl From<&GreenCodeError> for ErrorInfo {
    fn from(err: &GreenCodeError) -> Self {
        let message = match err {
            GreenCodeError::Validation(msg) => msg.clone(),
            other => format!("Failed to optimize code: {other}"),
        };
        Self {
            kind: err.kind(),
            status: err.status(),
            message,
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

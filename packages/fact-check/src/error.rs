//! Typed errors for the verification pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`). None of these reach
//! the caller of [`Verifier::verify`](crate::Verifier::verify): source errors
//! are absorbed into empty evidence sets and pipeline errors become the
//! fallback verdict.

use std::any::Any;
use thiserror::Error;

use crate::sources::SourceKind;

/// Errors raised by a single evidence source call.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source is disabled or has no credential
    #[error("source unavailable: {kind}")]
    Unavailable { kind: SourceKind },

    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Upstream answered with a non-success status
    #[error("upstream returned status {status}")]
    Status { status: u16 },

    /// Call exceeded the source's timeout
    #[error("timeout querying {kind}")]
    Timeout { kind: SourceKind },

    /// Request URL could not be built
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Payload parsed but did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider code panicked mid-call
    #[error("{kind} panicked: {message}")]
    Panicked { kind: SourceKind, message: String },
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SourceError::Status {
                status: status.as_u16(),
            },
            None => SourceError::Http(Box::new(err)),
        }
    }
}

/// Errors raised by the result cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A writer panicked while holding the cache lock
    #[error("cache lock poisoned")]
    Poisoned,
}

/// Errors inside the orchestration logic itself.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Cache could not be read or written
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// A stage panicked
    #[error("verification panicked: {0}")]
    Panicked(String),

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Any other internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Result type alias for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, VerifyError>;

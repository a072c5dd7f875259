//! Error types for page-session operations.

use innerverse_protocol::LessonId;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by loader, consumer, and gateway operations.
///
/// Every variant is terminal for its attempt: callers convert to a
/// user-visible fallback at the operation boundary and never retry
/// automatically.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The local backend does not know the lesson identifier.
    #[error("lesson not found: {0}")]
    NotFound(LessonId),
    /// A backend returned a non-success status.
    #[error("upstream failure: {0}")]
    Upstream(String),
    /// A stream completed normally but produced no text.
    #[error("stream completed with no content")]
    EmptyResponse,
    /// No chunk arrived within the per-chunk deadline.
    #[error("stream stalled: no chunk within {0:?}")]
    StreamTimeout(Duration),
    /// A best-effort persistence write failed.
    #[error("persistence write failed: {0}")]
    PersistenceWrite(String),
    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

//! Error types for the persistence store.

use thiserror::Error;

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying sqlite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Stored JSON column failed to encode or decode.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

//! Error types for the analysis store.

use thiserror::Error;

/// Convenient alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The UNIQUE (`repository`, `pr_number`) constraint was violated: an
    /// analysis for this pull request already exists. Callers treat this as
    /// "already done", not as a server fault.
    #[error("analysis already exists for this repository and pull request")]
    Duplicate,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A stored row failed to decode (bad timestamp or issues payload).
    #[error("corrupt stored record: {0}")]
    Corrupt(String),
}

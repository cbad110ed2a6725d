//! Error type for the persistence layer.

use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Lookup by primary key found no row.
    #[error("review request {0} not found")]
    RequestNotFound(i64),

    /// A status string in the database (or a filter) was not a known state.
    #[error("invalid review status: {0}")]
    InvalidStatus(String),
}

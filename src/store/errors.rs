//! # Store Errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Table store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not prepare the database file location
    #[error("Failed to prepare database directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any failure reported by the database engine.
    ///
    /// The display text is the engine's own message; it is what upsert and
    /// delete callers see in their `message` field.
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

//! # Config Errors
//!
//! Error types raised while loading the gateway config and the API key file.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON for the expected shape
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An API key entry has an empty key
    #[error("apikey_list[{index}]: key must not be empty")]
    EmptyKey { index: usize },

    /// An API key entry has a table name that is not a plain SQL identifier
    #[error("apikey_list[{index}]: invalid table name '{table}'")]
    InvalidTableName { index: usize, table: String },

    /// Two entries spell the same SQLite table with different case
    #[error("apikey_list[{index}]: table '{table}' collides with '{existing}' (table names are case-insensitive)")]
    TableNameCollision {
        index: usize,
        table: String,
        existing: String,
    },

    /// Unknown log format
    #[error("Invalid log_format: '{0}'. Must be 'pretty' or 'json'.")]
    InvalidLogFormat(String),

    /// Pool must hold at least one connection
    #[error("max_connections must be > 0")]
    ZeroConnections,
}

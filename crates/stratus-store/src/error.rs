//! Error types for stratus-store.

use std::path::PathBuf;

/// Result type for stratus-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stratus-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Location not found in database.
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Timestamp formatting error.
    #[error("Time formatting error: {0}")]
    TimeFormat(#[from] time::error::Format),

    /// Export produced invalid UTF-8.
    #[error("Invalid UTF-8 in export: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Error types for siplog-store.

use std::path::PathBuf;

use uuid::Uuid;

/// Result type for siplog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in siplog-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No record with the given id exists in the store.
    #[error("record not found: {0}")]
    NotFound(Uuid),

    /// Failed to create the snapshot directory.
    #[error("failed to create data directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

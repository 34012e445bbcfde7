//! Error types for divisplit operations.

use thiserror::Error;

/// Errors that can occur while transforming markup or export documents.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// The HTML tree was not in the shape a pass relies on.
    #[error("Broken tree invariant: {0}")]
    Invariant(String),

    #[error("Failed to process field '{field}': {source}")]
    Field {
        field: String,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

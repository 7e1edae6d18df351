//! Error types for the event store and its persistence backend.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected input for a new event. Nothing is stored when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in the event date")]
    MissingDate,

    #[error("Please fill in the event title")]
    MissingTitle,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),
}

/// Failure to hand the serialized store to the persistence backend.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to serialize events: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("No event ids left")]
    IdsExhausted,
}

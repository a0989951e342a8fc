use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error types for the Epochs scheduler and its collaborators.
#[derive(Debug, Error)]
pub enum EpochError {
    /// Storage layer error (read, write, iteration, lock poisoning).
    #[error("Storage error: {0}")]
    Storage(String),

    /// A lifecycle sink rejected a notification.
    #[error("Sink error: {0}")]
    Sink(String),

    /// A record failed validation (empty identifier, zero duration, ...).
    #[error("Invalid epoch record: {0}")]
    InvalidRecord(String),

    /// A record with this identifier already exists.
    #[error("Duplicate epoch identifier: {0}")]
    DuplicateIdentifier(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A record reached a state the scheduler cannot evaluate.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The host supplied a tick timestamp earlier than the previous one.
    #[error("Non-monotonic tick: {now} is before previous tick {previous}")]
    NonMonotonicTick {
        previous: DateTime<Utc>,
        now: DateTime<Utc>,
    },
}

impl From<serde_json::Error> for EpochError {
    fn from(e: serde_json::Error) -> Self {
        EpochError::Serialization(e.to_string())
    }
}

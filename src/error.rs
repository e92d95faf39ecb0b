//! Error types for the feedback store.

use thiserror::Error;

/// Main error type for feedback operations.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Flashing requires an active session. This is an illegal-state failure
    /// and is never retried.
    #[error("Feedback cannot be flashed because no session is active")]
    SessionInactive,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Session is locked by another process")]
    Locked,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for FeedbackError {
    fn from(e: serde_json::Error) -> Self {
        FeedbackError::InvalidConfig(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for FeedbackError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        FeedbackError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for FeedbackError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        FeedbackError::Deserialization(e.to_string())
    }
}

/// Result type for feedback operations.
pub type Result<T> = std::result::Result<T, FeedbackError>;

//! Triage error types

use ecoguard_types::{ReportId, ValidationError};
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the report producer
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Non-success response from the producer
    #[error("producer returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The producer answered but reported failure itself
    #[error("producer reported failure: {0}")]
    Rejected(String),

    /// Payload did not have the expected shape
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("producer did not answer within {0:?}")]
    Timeout(Duration),

    #[error("call cancelled")]
    Cancelled,

    /// Producer is unreachable (used by non-HTTP sources)
    #[error("producer unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Malformed(err.to_string())
        } else {
            TransportError::Http(err)
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Malformed(err.to_string())
    }
}

/// Triage engine errors
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("report not found: {0}")]
    NotFound(ReportId),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Caller's role does not allow the operation
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl TriageError {
    /// True for failures the operator may retry by re-issuing the call
    pub fn is_transport(&self) -> bool {
        matches!(self, TriageError::Transport(_))
    }
}

impl From<config::ConfigError> for TriageError {
    fn from(err: config::ConfigError) -> Self {
        TriageError::Config(err.to_string())
    }
}

/// Result type for triage operations
pub type TriageResult<T> = Result<T, TriageError>;

//! Validation errors raised while admitting producer data

use thiserror::Error;

/// A record or value that cannot be admitted as-is.
///
/// Ingestion rejects the offending record; nothing is clamped or guessed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("score {0} is outside [0.0, 1.0]")]
    ScoreOutOfRange(f64),

    #[error("score is not a finite number")]
    NonFiniteScore,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("report id is empty")]
    EmptyId,

    #[error("coordinates must carry both lat and lng")]
    PartialCoordinates,

    #[error("malformed coordinates ({lat}, {lng})")]
    MalformedCoordinates { lat: f64, lng: f64 },

    #[error("unknown category `{0}`")]
    UnknownCategory(String),

    #[error("unknown {kind} `{value}`")]
    UnknownLabel { kind: &'static str, value: String },

    #[error("malformed timestamp `{0}`")]
    MalformedTimestamp(String),
}

//! Severity classification
//!
//! Severity is a pure function of the confidence score. The bucket edges are
//! fixed and belong to the lower bucket: a score of exactly `0.40` is High,
//! anything above it is Critical.

use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scores strictly above this are Critical
pub const CRITICAL_THRESHOLD: f64 = 0.40;
/// Scores strictly above this (and up to Critical) are High
pub const HIGH_THRESHOLD: f64 = 0.20;
/// Scores strictly above this (and up to High) are Medium
pub const MEDIUM_THRESHOLD: f64 = 0.05;

/// Confidence score in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    /// Admit a raw score. Out-of-range values are an error, never clamped.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteScore);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::ScoreOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn severity(&self) -> Severity {
        classify(*self)
    }
}

impl TryFrom<f64> for Score {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Score::new(value)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Severity bucket, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Map a score to its severity bucket
pub fn classify(score: Score) -> Severity {
    let value = score.value();
    if value > CRITICAL_THRESHOLD {
        Severity::Critical
    } else if value > HIGH_THRESHOLD {
        Severity::High
    } else if value > MEDIUM_THRESHOLD {
        Severity::Medium
    } else {
        Severity::Low
    }
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Capitalized label, as the producer writes it into a status
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Display tone for an operator console
    pub fn tone(&self) -> Tone {
        match self {
            Severity::Critical => Tone::Danger,
            Severity::High => Tone::Warning,
            Severity::Medium | Severity::Low => Tone::Success,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "severity",
                value: s.to_string(),
            })
    }
}

// The producer writes "Critical", the console writes "critical"; accept both.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Visual tone shared by the console and the analysis payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Info,
    Warning,
    Danger,
}

//! Producer lifecycle labels
//!
//! The producer writes the landfill verdict ("Safe", "Suspicious Site",
//! "Illegal Dumping") or the deforestation severity ("Low" .. "Critical") into
//! a report's status. The label is informational: severity is always derived
//! from the score, never from here.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status label attached to a report by the producer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    Safe,
    SuspiciousSite,
    IllegalDumping,
    Low,
    Medium,
    High,
    Critical,
    /// Any label this crate does not know, kept verbatim
    Other(String),
}

impl ReportStatus {
    const KNOWN: [ReportStatus; 7] = [
        ReportStatus::Safe,
        ReportStatus::SuspiciousSite,
        ReportStatus::IllegalDumping,
        ReportStatus::Low,
        ReportStatus::Medium,
        ReportStatus::High,
        ReportStatus::Critical,
    ];

    /// Resolve a producer label, case-insensitively
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        Self::KNOWN
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| ReportStatus::Other(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Safe => "Safe",
            ReportStatus::SuspiciousSite => "Suspicious Site",
            ReportStatus::IllegalDumping => "Illegal Dumping",
            ReportStatus::Low => "Low",
            ReportStatus::Medium => "Medium",
            ReportStatus::High => "High",
            ReportStatus::Critical => "Critical",
            ReportStatus::Other(label) => label,
        }
    }

    /// Case-insensitive label equality
    pub fn same_label(&self, other: &ReportStatus) -> bool {
        self.as_str().eq_ignore_ascii_case(other.as_str())
    }

    /// Anything other than an explicit all-clear
    pub fn is_flagged(&self) -> bool {
        !matches!(self, ReportStatus::Safe)
    }
}

impl From<String> for ReportStatus {
    fn from(label: String) -> Self {
        ReportStatus::from_label(&label)
    }
}

impl From<ReportStatus> for String {
    fn from(status: ReportStatus) -> Self {
        status.as_str().to_string()
    }
}

impl From<Severity> for ReportStatus {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => ReportStatus::Low,
            Severity::Medium => ReportStatus::Medium,
            Severity::High => ReportStatus::High,
            Severity::Critical => ReportStatus::Critical,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

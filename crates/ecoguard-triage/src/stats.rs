//! Situational-awareness counters
//!
//! Always computed over the full, unfiltered report set at the moment of the
//! call; nothing is cached or maintained incrementally.

use crate::dispatch::DispatchTracker;
use ecoguard_types::{Category, Report, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary counters over the current report set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageStats {
    pub total: usize,
    /// Count per category; every known category is present, possibly at zero
    pub by_category: BTreeMap<Category, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    /// Reports in the Critical bucket
    pub critical: usize,
    pub dispatched: usize,
    /// `total - dispatched`, floored at zero
    pub pending: usize,
}

impl TriageStats {
    pub fn compute(reports: &[Report], tracker: &DispatchTracker) -> Self {
        let mut by_category: BTreeMap<Category, usize> =
            Category::ALL.into_iter().map(|c| (c, 0)).collect();
        let mut by_severity: BTreeMap<Severity, usize> =
            Severity::ALL.into_iter().map(|s| (s, 0)).collect();

        for report in reports {
            *by_category.entry(report.category).or_default() += 1;
            *by_severity.entry(report.severity()).or_default() += 1;
        }

        let total = reports.len();
        let dispatched = tracker.len();

        Self {
            total,
            critical: by_severity[&Severity::Critical],
            by_category,
            by_severity,
            dispatched,
            pending: total.saturating_sub(dispatched),
        }
    }

    pub fn category(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    pub fn severity(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}

//! Dispatch tracking
//!
//! Per report: `AwaitingCommand -> Dispatched`, and nothing after that. The
//! only way out of `Dispatched` is eviction when the report itself is deleted.
//! State lives for the session; it is not persisted.

use chrono::{DateTime, Utc};
use ecoguard_types::ReportId;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DispatchState {
    AwaitingCommand,
    Dispatched,
}

/// A response unit has been assigned to a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRecord {
    pub report_id: ReportId,
    pub dispatched_at: DateTime<Utc>,
    /// Subject of the operator who issued the command
    pub dispatched_by: Option<String>,
}

/// Result of a dispatch command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched,
    /// Already dispatched; nothing changed
    AlreadyDispatched,
}

/// Session-scoped set of dispatched reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchTracker {
    records: BTreeMap<ReportId, DispatchRecord>,
}

impl DispatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a report dispatched. Repeating the command is a no-op.
    pub fn dispatch(&mut self, id: &ReportId, by: Option<&str>) -> DispatchOutcome {
        if self.records.contains_key(id) {
            return DispatchOutcome::AlreadyDispatched;
        }
        self.records.insert(
            id.clone(),
            DispatchRecord {
                report_id: id.clone(),
                dispatched_at: Utc::now(),
                dispatched_by: by.map(str::to_string),
            },
        );
        DispatchOutcome::Dispatched
    }

    pub fn is_dispatched(&self, id: &ReportId) -> bool {
        self.records.contains_key(id)
    }

    pub fn state(&self, id: &ReportId) -> DispatchState {
        if self.is_dispatched(id) {
            DispatchState::Dispatched
        } else {
            DispatchState::AwaitingCommand
        }
    }

    pub fn record(&self, id: &ReportId) -> Option<&DispatchRecord> {
        self.records.get(id)
    }

    /// Drop tracking state for a deleted report
    pub fn evict(&mut self, id: &ReportId) -> bool {
        self.records.remove(id).is_some()
    }

    /// Number of dispatched reports
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &DispatchRecord> {
        self.records.values()
    }
}

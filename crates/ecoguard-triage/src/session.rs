//! Shared in-memory state of one operator session

use crate::dispatch::DispatchTracker;
use crate::ingest::{IngestBatch, RejectedRecord};
use crate::stats::TriageStats;
use chrono::{DateTime, Utc};
use ecoguard_types::{Report, ReportId};

/// Current report set plus the dispatch decisions made against it.
///
/// Both halves sit behind one lock so that removing a report and evicting
/// its dispatch record is a single step for any reader.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Current report set, in producer order
    pub reports: Vec<Report>,
    pub dispatch: DispatchTracker,
    /// Records refused by the last successful load
    pub rejected: Vec<RejectedRecord>,
    /// When the set was last replaced
    pub loaded_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn get(&self, id: &ReportId) -> Option<&Report> {
        self.reports.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &ReportId) -> bool {
        self.get(id).is_some()
    }

    /// Replace the report set wholesale. Dispatch decisions are kept.
    pub fn replace(&mut self, batch: IngestBatch) {
        self.reports = batch.reports;
        self.rejected = batch.rejected;
        self.loaded_at = Some(Utc::now());
    }

    /// Remove a report and evict its dispatch record
    pub fn remove(&mut self, id: &ReportId) -> Option<Report> {
        self.dispatch.evict(id);
        let position = self.reports.iter().position(|r| &r.id == id)?;
        Some(self.reports.remove(position))
    }

    pub fn stats(&self) -> TriageStats {
        TriageStats::compute(&self.reports, &self.dispatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecoguard_types::{Category, ReportStatus, Score};

    fn report(id: u64) -> Report {
        Report {
            id: ReportId::from(id),
            category: Category::Landfill,
            score: Score::new(0.5).unwrap(),
            status: ReportStatus::IllegalDumping,
            location: None,
            timestamp: Utc::now(),
            image_path: None,
        }
    }

    #[test]
    fn test_remove_evicts_dispatch() {
        let mut state = SessionState {
            reports: vec![report(1), report(2)],
            ..SessionState::default()
        };
        state.dispatch.dispatch(&ReportId::from(1), None);

        let removed = state.remove(&ReportId::from(1)).unwrap();
        assert_eq!(removed.id, ReportId::from(1));
        assert!(!state.dispatch.is_dispatched(&ReportId::from(1)));
        assert_eq!(state.reports.len(), 1);
    }

    #[test]
    fn test_replace_keeps_dispatch_state() {
        let mut state = SessionState::default();
        state.dispatch.dispatch(&ReportId::from(1), None);
        state.replace(IngestBatch {
            reports: vec![report(1)],
            rejected: Vec::new(),
        });
        assert!(state.dispatch.is_dispatched(&ReportId::from(1)));
        assert!(state.loaded_at.is_some());
    }
}

//! In-memory report source for tests and offline sessions

use super::{ProducerHealth, ReportSource};
use crate::error::{TransportError, TriageError, TriageResult};
use crate::ingest::{ingest_records, IngestBatch};
use async_trait::async_trait;
use ecoguard_types::{Report, ReportId, ReportRecord};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Producer stand-in holding raw records
///
/// Records are kept as raw JSON so that malformed producer data can be
/// staged as easily as good data. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Arc<RwLock<Vec<Value>>>,
    unavailable: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
    fetches: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source preloaded with raw records
    pub fn with_records(records: impl IntoIterator<Item = Value>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Source preloaded with already-valid reports
    pub fn with_reports(reports: impl IntoIterator<Item = Report>) -> Self {
        Self::with_records(reports.into_iter().filter_map(|report| {
            serde_json::to_value(ReportRecord::from(report)).ok()
        }))
    }

    /// Replace the whole collection
    pub async fn replace(&self, records: impl IntoIterator<Item = Value>) {
        *self.records.write().await = records.into_iter().collect();
    }

    pub async fn push(&self, record: Value) {
        self.records.write().await.push(record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Make every call fail as if the producer were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Completed or in-progress fetches so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at once
    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn simulate_call(&self) -> Result<(), TransportError> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable(
                "in-memory producer is offline".into(),
            ));
        }
        Ok(())
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn record_id(record: &Value) -> Option<ReportId> {
    record
        .get("id")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

#[async_trait]
impl ReportSource for InMemorySource {
    async fn fetch_reports(&self) -> TriageResult<IngestBatch> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        self.simulate_call().await?;
        let records = self.records.read().await.clone();
        Ok(ingest_records(records))
    }

    async fn delete_report(&self, id: &ReportId) -> TriageResult<()> {
        self.simulate_call().await?;
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|r| record_id(r).as_ref() == Some(id))
            .ok_or_else(|| TriageError::NotFound(id.clone()))?;
        records.remove(position);
        Ok(())
    }

    async fn health(&self) -> TriageResult<ProducerHealth> {
        self.simulate_call().await?;
        Ok(ProducerHealth {
            status: "healthy".into(),
            device: Some("memory".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: u64) -> Value {
        json!({
            "id": id,
            "category": "deforestation",
            "score": 0.2,
            "status": "High",
            "timestamp": "2024-03-01T10:15:30Z"
        })
    }

    #[tokio::test]
    async fn test_fetch_and_delete() {
        let source = InMemorySource::with_records(vec![record(1), record(2)]);
        assert_eq!(source.fetch_reports().await.unwrap().reports.len(), 2);

        source.delete_report(&ReportId::from(1)).await.unwrap();
        assert_eq!(source.len().await, 1);
        assert!(matches!(
            source.delete_report(&ReportId::from(1)).await,
            Err(TriageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_preloaded_reports_are_admitted_unchanged() {
        use chrono::TimeZone;
        use ecoguard_types::{Category, Coordinates, ReportStatus, Score};

        let report = Report {
            id: ReportId::from(7),
            category: Category::Landfill,
            score: Score::new(0.5).unwrap(),
            status: ReportStatus::SuspiciousSite,
            location: Some(Coordinates::new(12.9716, 77.5946).unwrap()),
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap(),
            image_path: None,
        };
        let source = InMemorySource::with_reports(vec![report.clone()]);
        assert_eq!(source.len().await, 1);

        let batch = source.fetch_reports().await.unwrap();
        assert_eq!(batch.reports, vec![report]);
        assert!(batch.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_source_fails_every_call() {
        let source = InMemorySource::with_records(vec![record(1)]);
        source.set_unavailable(true);
        assert!(source.fetch_reports().await.unwrap_err().is_transport());
        assert!(source.health().await.unwrap_err().is_transport());
        assert_eq!(source.len().await, 1);
    }

    #[tokio::test]
    async fn test_in_flight_is_released_on_failure() {
        let source = InMemorySource::new();
        source.set_unavailable(true);
        let _ = source.fetch_reports().await;
        assert_eq!(source.in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(source.fetch_count(), 1);
    }
}

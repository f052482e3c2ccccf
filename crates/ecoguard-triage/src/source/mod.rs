//! Report producer seam
//!
//! The engine only ever talks to the producer through [`ReportSource`]. The
//! HTTP implementation fronts the real detection service; the in-memory one
//! backs tests and offline sessions.

mod http;
mod memory;

pub use http::HttpReportSource;
pub use memory::InMemorySource;

use crate::error::TriageResult;
use crate::ingest::IngestBatch;
use async_trait::async_trait;
use ecoguard_types::ReportId;
use serde::{Deserialize, Serialize};

/// Producer liveness as reported by its health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerHealth {
    pub status: String,
    /// Inference device the producer runs on (`cpu`, `cuda`, ...)
    #[serde(default)]
    pub device: Option<String>,
}

impl ProducerHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "healthy" | "ok")
    }
}

/// Source of truth for the report collection
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch and admit the full report collection, newest first as the
    /// producer orders it
    async fn fetch_reports(&self) -> TriageResult<IngestBatch>;

    /// Delete a report at the producer
    async fn delete_report(&self, id: &ReportId) -> TriageResult<()>;

    /// Check the producer is up
    async fn health(&self) -> TriageResult<ProducerHealth>;
}

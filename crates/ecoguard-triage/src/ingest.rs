//! Admission of producer payloads
//!
//! A malformed envelope fails the whole load. A malformed record only fails
//! itself: it is rejected and logged, and the rest of the batch is admitted.

use crate::error::TransportError;
use ecoguard_types::{Report, ReportId, ReportRecord, ValidationError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Outcome of admitting one reports payload
#[derive(Debug, Clone, Default)]
pub struct IngestBatch {
    /// Admitted reports, in producer order
    pub reports: Vec<Report>,
    pub rejected: Vec<RejectedRecord>,
}

/// A record that failed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    /// Position in the producer's list
    pub position: usize,
    pub id: Option<ReportId>,
    pub reason: String,
}

/// Admit a `{ success?, reports: [...] }` envelope
pub fn ingest_envelope(payload: Value) -> Result<IngestBatch, TransportError> {
    let Value::Object(mut envelope) = payload else {
        return Err(TransportError::Malformed(
            "expected a JSON object envelope".into(),
        ));
    };

    if let Some(Value::Bool(false)) = envelope.get("success") {
        let reason = envelope
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("no reason given")
            .to_string();
        return Err(TransportError::Rejected(reason));
    }

    match envelope.remove("reports") {
        Some(Value::Array(records)) => Ok(ingest_records(records)),
        Some(_) => Err(TransportError::Malformed(
            "`reports` is not an array".into(),
        )),
        None => Err(TransportError::Malformed("missing `reports`".into())),
    }
}

/// Validate records one by one, keeping producer order
pub fn ingest_records(records: impl IntoIterator<Item = Value>) -> IngestBatch {
    let mut batch = IngestBatch::default();
    let mut seen = HashSet::new();

    for (position, raw) in records.into_iter().enumerate() {
        let id = raw.get("id").and_then(|v| serde_json::from_value(v.clone()).ok());

        match admit(raw) {
            Ok(report) if !seen.insert(report.id.clone()) => {
                batch.rejected.push(reject(position, id, "duplicate report id".into()));
            }
            Ok(report) => batch.reports.push(report),
            Err(reason) => batch.rejected.push(reject(position, id, reason)),
        }
    }

    batch
}

fn admit(raw: Value) -> Result<Report, String> {
    let record: ReportRecord = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    Report::try_from(record).map_err(|e: ValidationError| e.to_string())
}

fn reject(position: usize, id: Option<ReportId>, reason: String) -> RejectedRecord {
    tracing::warn!(
        position,
        report_id = ?id,
        reason = %reason,
        "Rejected report record"
    );
    RejectedRecord {
        position,
        id,
        reason,
    }
}

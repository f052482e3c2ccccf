//! Operator triage desk
//!
//! Entry point for a presentation layer. Every operation is gated on the
//! operator's claim, which arrives already verified.

use crate::config::TriageConfig;
use crate::dispatch::{DispatchOutcome, DispatchRecord, DispatchState};
use crate::error::{TriageError, TriageResult};
use crate::filter::{apply, ReportFilter};
use crate::hotspot::{self, CommunityAlert};
use crate::ingest::RejectedRecord;
use crate::repository::ReportRepository;
use crate::source::ProducerHealth;
use crate::stats::TriageStats;
use ecoguard_types::{OperatorClaim, Report, ReportId};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One operator's view onto a shared report repository
#[derive(Clone)]
pub struct TriageDesk {
    repository: Arc<ReportRepository>,
    claim: OperatorClaim,
}

impl TriageDesk {
    pub fn new(repository: Arc<ReportRepository>, claim: OperatorClaim) -> Self {
        Self { repository, claim }
    }

    /// Desk over the HTTP producer described by `config`
    pub fn from_config(config: &TriageConfig, claim: OperatorClaim) -> TriageResult<Self> {
        let repository = ReportRepository::from_config(config)?;
        Ok(Self::new(Arc::new(repository), claim))
    }

    pub fn claim(&self) -> &OperatorClaim {
        &self.claim
    }

    pub fn repository(&self) -> &Arc<ReportRepository> {
        &self.repository
    }

    fn authorize(&self, action: &str) -> TriageResult<()> {
        if self.claim.role().can_triage() {
            return Ok(());
        }
        tracing::warn!(
            subject = %self.claim.subject(),
            role = %self.claim.role(),
            action,
            "Access denied"
        );
        Err(TriageError::AccessDenied(format!(
            "role {} may not {}",
            self.claim.role(),
            action
        )))
    }

    /// Reload the report set from the producer
    pub async fn refresh(&self) -> TriageResult<Vec<Report>> {
        self.refresh_with(&CancellationToken::new()).await
    }

    pub async fn refresh_with(&self, cancel: &CancellationToken) -> TriageResult<Vec<Report>> {
        self.authorize("refresh reports")?;
        self.repository.load_all_with(cancel).await
    }

    /// Reports matching `filter`, in producer order
    pub async fn reports(&self, filter: &ReportFilter) -> TriageResult<Vec<Report>> {
        self.authorize("list reports")?;
        let state = self.repository.read().await;
        Ok(apply(&state.reports, filter))
    }

    pub async fn report(&self, id: &ReportId) -> TriageResult<Report> {
        self.authorize("view reports")?;
        self.repository
            .get(id)
            .await
            .ok_or_else(|| TriageError::NotFound(id.clone()))
    }

    pub async fn stats(&self) -> TriageResult<TriageStats> {
        self.authorize("view stats")?;
        Ok(self.repository.read().await.stats())
    }

    /// Mark a report as having a response unit assigned
    pub async fn dispatch(&self, id: &ReportId) -> TriageResult<DispatchOutcome> {
        self.authorize("dispatch")?;
        let mut state = self.repository.write().await;
        if !state.contains(id) {
            return Err(TriageError::NotFound(id.clone()));
        }

        let outcome = state.dispatch.dispatch(id, Some(self.claim.subject()));
        match outcome {
            DispatchOutcome::Dispatched => tracing::info!(
                report_id = %id,
                dispatched_by = %self.claim.subject(),
                "Dispatched report"
            ),
            DispatchOutcome::AlreadyDispatched => {
                tracing::debug!(report_id = %id, "Report already dispatched")
            }
        }
        Ok(outcome)
    }

    pub async fn is_dispatched(&self, id: &ReportId) -> TriageResult<bool> {
        self.authorize("view dispatch state")?;
        Ok(self.repository.read().await.dispatch.is_dispatched(id))
    }

    pub async fn dispatch_state(&self, id: &ReportId) -> TriageResult<DispatchState> {
        self.authorize("view dispatch state")?;
        Ok(self.repository.read().await.dispatch.state(id))
    }

    pub async fn dispatch_record(&self, id: &ReportId) -> TriageResult<Option<DispatchRecord>> {
        self.authorize("view dispatch state")?;
        Ok(self.repository.read().await.dispatch.record(id).cloned())
    }

    /// Delete a report at the producer and locally
    pub async fn delete(&self, id: &ReportId) -> TriageResult<()> {
        self.delete_with(id, &CancellationToken::new()).await
    }

    pub async fn delete_with(&self, id: &ReportId, cancel: &CancellationToken) -> TriageResult<()> {
        self.authorize("delete reports")?;
        self.repository.delete_by_id_with(id, cancel).await
    }

    /// Landfill sites that warrant a community alert
    pub async fn alerts(&self) -> TriageResult<Vec<CommunityAlert>> {
        self.authorize("view alerts")?;
        let alerts = hotspot::alerts(&self.repository.read().await.reports);
        for alert in &alerts {
            tracing::warn!(
                report_id = %alert.report_id,
                reason = ?alert.reason,
                "Community alert"
            );
        }
        Ok(alerts)
    }

    /// Records refused by the last successful load
    pub async fn rejections(&self) -> TriageResult<Vec<RejectedRecord>> {
        self.authorize("view rejections")?;
        Ok(self.repository.read().await.rejected.clone())
    }

    pub async fn health(&self) -> TriageResult<ProducerHealth> {
        self.authorize("check producer health")?;
        self.repository.health(&CancellationToken::new()).await
    }
}

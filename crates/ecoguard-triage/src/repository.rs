//! Report repository
//!
//! Owns the session's single in-memory report set. Producer calls are bounded
//! by a timeout and a cancellation token, and never run while the state lock
//! is held, so readers stay responsive during a slow load.

use crate::config::TriageConfig;
use crate::error::{TransportError, TriageResult};
use crate::session::SessionState;
use crate::source::{HttpReportSource, ProducerHealth, ReportSource};
use ecoguard_types::{Report, ReportId};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

pub struct ReportRepository {
    source: Arc<dyn ReportSource>,
    state: RwLock<SessionState>,
    /// Serializes load and delete so two calls never interleave
    writer: Mutex<()>,
    call_timeout: Duration,
}

impl ReportRepository {
    pub fn new(source: Arc<dyn ReportSource>, call_timeout: Duration) -> Self {
        Self {
            source,
            state: RwLock::new(SessionState::default()),
            writer: Mutex::new(()),
            call_timeout,
        }
    }

    /// Repository over the HTTP producer described by `config`
    pub fn from_config(config: &TriageConfig) -> TriageResult<Self> {
        config.validate()?;
        let source = HttpReportSource::new(&config.producer)?;
        Ok(Self::new(Arc::new(source), config.producer.request_timeout()))
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Reload the full set from the producer
    pub async fn load_all(&self) -> TriageResult<Vec<Report>> {
        self.load_all_with(&CancellationToken::new()).await
    }

    /// Reload the full set, giving up when `cancel` fires.
    ///
    /// On any failure the current set is left as it was.
    pub async fn load_all_with(&self, cancel: &CancellationToken) -> TriageResult<Vec<Report>> {
        let _writer = self.writer.lock().await;
        tracing::debug!("Loading reports");

        let batch = match self.bounded(cancel, self.source.fetch_reports()).await {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!(error = %err, "Report load failed, keeping current set");
                return Err(err);
            }
        };

        let accepted = batch.reports.len();
        let rejected = batch.rejected.len();
        let mut state = self.state.write().await;
        state.replace(batch);
        tracing::info!(accepted, rejected, "Loaded reports");
        Ok(state.reports.clone())
    }

    /// Delete a report at the producer, then drop it locally
    pub async fn delete_by_id(&self, id: &ReportId) -> TriageResult<()> {
        self.delete_by_id_with(id, &CancellationToken::new()).await
    }

    pub async fn delete_by_id_with(
        &self,
        id: &ReportId,
        cancel: &CancellationToken,
    ) -> TriageResult<()> {
        let _writer = self.writer.lock().await;

        if let Err(err) = self.bounded(cancel, self.source.delete_report(id)).await {
            tracing::warn!(report_id = %id, error = %err, "Delete failed");
            return Err(err);
        }

        let mut state = self.state.write().await;
        let was_dispatched = state.dispatch.is_dispatched(id);
        state.remove(id);
        tracing::info!(report_id = %id, was_dispatched, "Deleted report");
        Ok(())
    }

    /// Check the producer is up
    pub async fn health(&self, cancel: &CancellationToken) -> TriageResult<ProducerHealth> {
        self.bounded(cancel, self.source.health()).await
    }

    /// Snapshot of the current set
    pub async fn reports(&self) -> Vec<Report> {
        self.state.read().await.reports.clone()
    }

    pub async fn get(&self, id: &ReportId) -> Option<Report> {
        self.state.read().await.get(id).cloned()
    }

    /// Consistent read view of reports and dispatch state
    pub async fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().await
    }

    async fn bounded<T>(
        &self,
        cancel: &CancellationToken,
        call: impl Future<Output = TriageResult<T>>,
    ) -> TriageResult<T> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled.into()),
            outcome = tokio::time::timeout(self.call_timeout, call) => match outcome {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout(self.call_timeout).into()),
            },
        }
    }
}

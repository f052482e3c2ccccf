//! HTTP report source

use super::{ProducerHealth, ReportSource};
use crate::config::ProducerConfig;
use crate::error::{TransportError, TriageError, TriageResult};
use crate::ingest::{ingest_envelope, IngestBatch};
use async_trait::async_trait;
use ecoguard_types::ReportId;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Client for the detection service's report API
pub struct HttpReportSource {
    client: Client,
    base_url: String,
    reports_path: String,
    health_path: String,
    request_timeout: Duration,
}

impl HttpReportSource {
    /// Create a source from producer settings
    pub fn new(config: &ProducerConfig) -> TriageResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(TransportError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            reports_path: config.reports_path.trim_end_matches('/').to_string(),
            health_path: config.health_path.clone(),
            request_timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The id travels as a single path segment, percent-encoded
    fn report_url(&self, id: &ReportId) -> TriageResult<Url> {
        let collection = self.url(&self.reports_path);
        let mut url = Url::parse(&collection).map_err(|e| {
            TriageError::Config(format!("Invalid reports URL {}: {}", collection, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| TriageError::Config(format!("Reports URL {} cannot take a path", collection)))?
            .push(id.as_str());
        Ok(url)
    }

    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await.map_err(|e| self.classify(e))?;
            if body.is_empty() {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(TransportError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.request_timeout)
        } else {
            TransportError::from(err)
        }
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch_reports(&self) -> TriageResult<IngestBatch> {
        tracing::debug!(url = %self.url(&self.reports_path), "Fetching reports");
        let payload = self.get(&self.reports_path).await?;
        Ok(ingest_envelope(payload)?)
    }

    async fn delete_report(&self, id: &ReportId) -> TriageResult<()> {
        let response = self
            .client
            .delete(self.report_url(id)?)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TriageError::NotFound(id.clone()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        // No body is required; only an explicit `success: false` refuses
        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        if let Ok(Value::Object(body)) = serde_json::from_slice::<Value>(&body) {
            if let Some(Value::Bool(false)) = body.get("success") {
                let reason = body
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("delete refused")
                    .to_string();
                return Err(TransportError::Rejected(reason).into());
            }
        }
        Ok(())
    }

    async fn health(&self) -> TriageResult<ProducerHealth> {
        let body = self.get(&self.health_path).await?;
        Ok(serde_json::from_value(body).map_err(TransportError::from)?)
    }
}

//! Configuration for the triage engine

use crate::error::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main triage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Report producer connection
    #[serde(default)]
    pub producer: ProducerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Report producer connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerConfig {
    /// Base URL of the producer
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the reports collection
    #[serde(default = "default_reports_path")]
    pub reports_path: String,

    /// Path of the health endpoint
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Upper bound on any single producer call, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            reports_path: default_reports_path(),
            health_path: default_health_path(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ProducerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_reports_path() -> String {
    "/api/reports".to_string()
}

fn default_health_path() -> String {
    "/api/health".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TriageConfig {
    /// Load configuration from defaults, an optional file and `ECOGUARD_*`
    /// environment variables, in that order of precedence
    pub fn load(path: Option<&str>) -> TriageResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&TriageConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // ECOGUARD_PRODUCER__BASE_URL, ECOGUARD_LOGGING__LEVEL, ...
        builder = builder.add_source(
            config::Environment::with_prefix("ECOGUARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: TriageConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> TriageResult<()> {
        reqwest::Url::parse(&self.producer.base_url).map_err(|e| {
            TriageError::Config(format!(
                "Invalid producer base URL {}: {}",
                self.producer.base_url, e
            ))
        })?;
        if self.producer.request_timeout_secs == 0 {
            return Err(TriageError::Config(
                "producer.request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.producer.connect_timeout_secs == 0 {
            return Err(TriageError::Config(
                "producer.connect_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Point the producer at another base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.producer.base_url = base_url.into();
        self
    }
}

//! EcoGuard Triage - incident triage and dispatch engine
//!
//! Loads reports from the producer, keeps them as one in-memory set per
//! session, and lets an operator filter them, track dispatch decisions and
//! watch summary counters.
//!
//! ## Architecture
//!
//! ```text
//! producer ──► ReportSource ──► ingest ──► ReportRepository ──► TriageDesk
//!                                             │ SessionState        │
//!                                             │  reports            ├─ filter
//!                                             │  dispatch tracker   ├─ stats
//!                                             └──────────────────── └─ hotspot
//! ```
//!
//! The library never installs a tracing subscriber; that is left to the
//! binary embedding it.

#![deny(unsafe_code)]

pub mod config;
pub mod desk;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod hotspot;
pub mod ingest;
pub mod repository;
pub mod session;
pub mod source;
pub mod stats;

pub use config::{LoggingConfig, ProducerConfig, TriageConfig};
pub use desk::TriageDesk;
pub use dispatch::{DispatchOutcome, DispatchRecord, DispatchState, DispatchTracker};
pub use error::{TransportError, TriageError, TriageResult};
pub use filter::{apply, apply_predicates, Predicate, ReportFilter, SearchQuery, Selector};
pub use hotspot::{AlertReason, CommunityAlert};
pub use ingest::{ingest_envelope, ingest_records, IngestBatch, RejectedRecord};
pub use repository::ReportRepository;
pub use session::SessionState;
pub use source::{HttpReportSource, InMemorySource, ProducerHealth, ReportSource};
pub use stats::TriageStats;

pub use ecoguard_types::classify;
pub use tokio_util::sync::CancellationToken;

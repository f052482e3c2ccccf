//! EcoGuard Types - Core types for environmental incident triage
//!
//! Reports are produced by an external image-inference pipeline and only read,
//! filtered and deleted by the triage engine. This crate holds the shared data
//! model and the pure rules derived from it.
//!
//! ## Key Concepts
//!
//! - **Report**: one incident observation, identified by a producer-assigned id
//! - **Score**: inference confidence, always within `[0.0, 1.0]`
//! - **Severity**: Low/Medium/High/Critical bucket derived from the score alone
//! - **ReportStatus**: the producer's lifecycle label (never used for severity)
//! - **OperatorClaim**: a verified caller role handed in by the surrounding app

#![deny(unsafe_code)]

pub mod analysis;
pub mod category;
pub mod error;
pub mod ids;
pub mod report;
pub mod role;
pub mod severity;
pub mod status;
mod timestamp;

pub use analysis::{
    deforestation_recommendations, deforestation_severity, DeforestationAnalysis,
    LandfillAnalysis, LandfillVerdict, ReportDraft,
};
pub use category::Category;
pub use error::ValidationError;
pub use ids::ReportId;
pub use report::{Coordinates, Report, ReportRecord};
pub use role::{OperatorClaim, Role};
pub use severity::{classify, Score, Severity, Tone};
pub use status::ReportStatus;

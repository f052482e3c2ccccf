//! One-shot analysis payloads
//!
//! The producer's landfill and deforestation endpoints answer with a verdict,
//! a confidence or loss figure and an optional heatmap. The triage engine never
//! calls them, but a presentation layer can turn their answers into a
//! [`ReportDraft`] using the same rules the producer applies when it files a
//! geotagged report.

use crate::category::Category;
use crate::error::ValidationError;
use crate::report::Coordinates;
use crate::severity::{Score, Severity, Tone};
use crate::status::ReportStatus;
use serde::{Deserialize, Serialize};

/// Landfill verdict thresholds on the final score
const ILLEGAL_DUMPING_ABOVE: f64 = 0.65;
const SUSPICIOUS_SITE_ABOVE: f64 = 0.30;

/// Deforestation severity thresholds on vegetation loss, in percent
const LOSS_CRITICAL_ABOVE: f64 = 30.0;
const LOSS_HIGH_ABOVE: f64 = 15.0;
const LOSS_MEDIUM_ABOVE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandfillVerdict {
    Safe,
    SuspiciousSite,
    IllegalDumping,
}

impl LandfillVerdict {
    pub fn from_score(score: Score) -> Self {
        let value = score.value();
        if value > ILLEGAL_DUMPING_ABOVE {
            LandfillVerdict::IllegalDumping
        } else if value > SUSPICIOUS_SITE_ABOVE {
            LandfillVerdict::SuspiciousSite
        } else {
            LandfillVerdict::Safe
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            LandfillVerdict::Safe => Tone::Success,
            LandfillVerdict::SuspiciousSite => Tone::Warning,
            LandfillVerdict::IllegalDumping => Tone::Danger,
        }
    }

    pub fn status(&self) -> ReportStatus {
        match self {
            LandfillVerdict::Safe => ReportStatus::Safe,
            LandfillVerdict::SuspiciousSite => ReportStatus::SuspiciousSite,
            LandfillVerdict::IllegalDumping => ReportStatus::IllegalDumping,
        }
    }
}

/// Severity of a measured vegetation loss (percent)
pub fn deforestation_severity(loss_percent: f64) -> Severity {
    if loss_percent > LOSS_CRITICAL_ABOVE {
        Severity::Critical
    } else if loss_percent > LOSS_HIGH_ABOVE {
        Severity::High
    } else if loss_percent > LOSS_MEDIUM_ABOVE {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// The two follow-up lines attached to a deforestation result
pub fn deforestation_recommendations(severity: Severity) -> Vec<String> {
    let field = match severity {
        Severity::Critical | Severity::High => "Deploy ground task force for verification",
        Severity::Medium | Severity::Low => "Continue remote monitoring",
    };
    let permits = match severity {
        Severity::Low => "Area appears stable",
        _ => "Check for illegal logging permits",
    };
    vec![field.to_string(), permits.to_string()]
}

/// Answer of the landfill classification endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandfillAnalysis {
    pub success: bool,
    /// Upper-cased verdict label, e.g. `ILLEGAL DUMPING`
    pub prediction: String,
    pub status_type: Tone,
    /// Final score as a percentage, two decimals
    pub confidence: f64,
    #[serde(default)]
    pub heatmap: Option<String>,
    #[serde(default)]
    pub geo_tagged: bool,
    #[serde(default)]
    pub community_alert: bool,
}

impl LandfillAnalysis {
    pub fn score(&self) -> Result<Score, ValidationError> {
        Score::new(self.confidence / 100.0)
    }

    pub fn verdict(&self) -> Result<LandfillVerdict, ValidationError> {
        self.score().map(LandfillVerdict::from_score)
    }

    pub fn to_draft(&self, location: Option<Coordinates>) -> Result<ReportDraft, ValidationError> {
        let score = self.score()?;
        Ok(ReportDraft {
            category: Category::Landfill,
            score,
            status: LandfillVerdict::from_score(score).status(),
            location,
        })
    }
}

/// Answer of the before/after deforestation comparison endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeforestationAnalysis {
    pub success: bool,
    /// Vegetation loss in percent
    pub vegetation_loss: f64,
    pub severity: Severity,
    pub status_type: Tone,
    #[serde(default)]
    pub heatmap: Option<String>,
    #[serde(default)]
    pub geo_tagged: bool,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl DeforestationAnalysis {
    pub fn to_draft(&self, location: Option<Coordinates>) -> Result<ReportDraft, ValidationError> {
        Ok(ReportDraft {
            category: Category::Deforestation,
            score: Score::new(self.vegetation_loss / 100.0)?,
            status: ReportStatus::from(self.severity),
            location,
        })
    }
}

/// A report as it would be filed by the producer, before it is assigned an id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDraft {
    pub category: Category,
    pub score: Score,
    pub status: ReportStatus,
    pub location: Option<Coordinates>,
}

impl ReportDraft {
    pub fn severity(&self) -> Severity {
        self.score.severity()
    }
}

//! Incident reports
//!
//! [`ReportRecord`] is the loose wire shape served by the producer;
//! [`Report`] is the validated form the triage engine works with. Conversion
//! between the two is where every data-integrity rule is enforced.

use crate::category::Category;
use crate::error::ValidationError;
use crate::ids::ReportId;
use crate::severity::{Score, Severity};
use crate::status::ReportStatus;
use crate::timestamp::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic position of an observation, in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        if valid {
            Ok(Self { lat, lng })
        } else {
            Err(ValidationError::MalformedCoordinates { lat, lng })
        }
    }

    /// Both-or-neither admission of an optional pair
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Self>, ValidationError> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng).map(Some),
            (None, None) => Ok(None),
            _ => Err(ValidationError::PartialCoordinates),
        }
    }

    /// True when both axes differ by less than `degrees`
    pub fn is_near(&self, other: &Coordinates, degrees: f64) -> bool {
        (self.lat - other.lat).abs() < degrees && (self.lng - other.lng).abs() < degrees
    }
}

/// A validated incident report.
///
/// Reports are immutable once created; the triage engine only reads, filters
/// and deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReportRecord", into = "ReportRecord")]
pub struct Report {
    pub id: ReportId,
    pub category: Category,
    pub score: Score,
    pub status: ReportStatus,
    pub location: Option<Coordinates>,
    pub timestamp: DateTime<Utc>,
    pub image_path: Option<String>,
}

impl Report {
    /// Severity bucket derived from the score alone
    pub fn severity(&self) -> Severity {
        self.score.severity()
    }

    pub fn lat(&self) -> Option<f64> {
        self.location.map(|c| c.lat)
    }

    pub fn lng(&self) -> Option<f64> {
        self.location.map(|c| c.lng)
    }

    pub fn has_evidence(&self) -> bool {
        self.image_path.is_some()
    }
}

/// Wire shape of a report in the producer's `reports` collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: Option<ReportId>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
}

impl TryFrom<ReportRecord> for Report {
    type Error = ValidationError;

    fn try_from(record: ReportRecord) -> Result<Self, Self::Error> {
        let id = record.id.ok_or(ValidationError::MissingField("id"))?;
        if id.is_empty() {
            return Err(ValidationError::EmptyId);
        }

        let category = record
            .category
            .ok_or(ValidationError::MissingField("category"))?
            .parse::<Category>()?;
        let score = Score::new(record.score.ok_or(ValidationError::MissingField("score"))?)?;
        let status = ReportStatus::from_label(
            &record.status.ok_or(ValidationError::MissingField("status"))?,
        );
        let location = Coordinates::from_parts(record.lat, record.lng)?;
        let timestamp = parse_timestamp(
            &record
                .timestamp
                .ok_or(ValidationError::MissingField("timestamp"))?,
        )?;
        let image_path = record
            .image_path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(Report {
            id,
            category,
            score,
            status,
            location,
            timestamp,
            image_path,
        })
    }
}

impl From<Report> for ReportRecord {
    fn from(report: Report) -> Self {
        let (lat, lng) = (report.lat(), report.lng());
        ReportRecord {
            id: Some(report.id),
            category: Some(report.category.as_str().to_string()),
            score: Some(report.score.value()),
            status: Some(report.status.as_str().to_string()),
            lat,
            lng,
            timestamp: Some(report.timestamp.to_rfc3339()),
            image_path: report.image_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ReportRecord {
        ReportRecord {
            id: Some(ReportId::from(7)),
            category: Some("landfill".into()),
            score: Some(0.45),
            status: Some("Illegal Dumping".into()),
            lat: Some(12.9716),
            lng: Some(77.5946),
            timestamp: Some("2024-03-01 10:15:30.123456".into()),
            image_path: Some("/uploads/reports/landfill_20240301_101530.png".into()),
        }
    }

    #[test]
    fn test_valid_record_is_admitted() {
        let report = Report::try_from(record()).unwrap();
        assert_eq!(report.id.as_str(), "7");
        assert_eq!(report.category, Category::Landfill);
        assert_eq!(report.severity(), Severity::Critical);
        assert_eq!(report.status, ReportStatus::IllegalDumping);
        assert_eq!(report.lat(), Some(12.9716));
        assert!(report.has_evidence());
    }

    #[test]
    fn test_out_of_range_score_is_rejected_not_clamped() {
        let mut raw = record();
        raw.score = Some(1.3);
        assert_eq!(
            Report::try_from(raw).unwrap_err(),
            ValidationError::ScoreOutOfRange(1.3)
        );
    }

    #[test]
    fn test_missing_score_is_rejected() {
        let mut raw = record();
        raw.score = None;
        assert_eq!(
            Report::try_from(raw).unwrap_err(),
            ValidationError::MissingField("score")
        );
    }

    #[test]
    fn test_half_a_coordinate_is_rejected() {
        let mut raw = record();
        raw.lng = None;
        assert_eq!(
            Report::try_from(raw).unwrap_err(),
            ValidationError::PartialCoordinates
        );
    }

    #[test]
    fn test_malformed_coordinates_are_rejected() {
        let mut raw = record();
        raw.lat = Some(123.0);
        assert!(matches!(
            Report::try_from(raw).unwrap_err(),
            ValidationError::MalformedCoordinates { .. }
        ));
    }

    #[test]
    fn test_report_without_location_or_image_is_valid() {
        let mut raw = record();
        raw.lat = None;
        raw.lng = None;
        raw.image_path = Some("".into());
        let report = Report::try_from(raw).unwrap();
        assert!(report.location.is_none());
        assert!(!report.has_evidence());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"id": 3, "category": "landfill", "score": 0.03, "status": "Safe",
                       "lat": null, "lng": null, "timestamp": "2024-03-01T00:00:00Z"}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.severity(), Severity::Low);

        let bad = r#"{"id": 3, "category": "landfill", "score": 7.0, "status": "Safe",
                      "timestamp": "2024-03-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Report>(bad).is_err());
    }

    #[test]
    fn test_serialized_form_is_wire_shape() {
        let report = Report::try_from(record()).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["category"], "landfill");
        assert_eq!(value["status"], "Illegal Dumping");
        assert_eq!(value["lat"], 12.9716);
        assert_eq!(value["lng"], 77.5946);
    }

    #[test]
    fn test_record_from_report_keeps_every_field() {
        let report = Report::try_from(record()).unwrap();
        let back = ReportRecord::from(report.clone());
        assert_eq!(back.id, Some(report.id.clone()));
        assert_eq!(back.lat, Some(12.9716));
        assert_eq!(back.lng, Some(77.5946));
        assert_eq!(Report::try_from(back).unwrap(), report);
    }
}

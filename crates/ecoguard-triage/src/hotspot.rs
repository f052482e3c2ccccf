//! Community alerts for landfill hotspots
//!
//! A landfill site escalates to the community when a single observation is
//! confidently illegal dumping, or when flagged observations of any category
//! keep piling up at the same spot.

use ecoguard_types::{Category, Coordinates, Report, ReportId, ReportStatus};
use serde::Serialize;

/// Two observations closer than this on both axes are the same site
pub const SITE_RADIUS_DEGREES: f64 = 0.001;
/// Flagged observations at one site that trigger an alert
pub const CLUSTER_THRESHOLD: usize = 3;
/// Illegal-dumping scores above this alert on their own
pub const ESCALATION_SCORE: f64 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertReason {
    HighConfidence,
    Cluster { flagged_nearby: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityAlert {
    pub report_id: ReportId,
    pub location: Coordinates,
    pub reason: AlertReason,
}

/// Flagged reports at the same site as `point`, whatever their category
pub fn flagged_nearby(reports: &[Report], point: &Coordinates) -> usize {
    reports
        .iter()
        .filter(|r| r.status.is_flagged())
        .filter_map(|r| r.location)
        .filter(|loc| loc.is_near(point, SITE_RADIUS_DEGREES))
        .count()
}

/// Alert for `report`, judged against the whole set.
///
/// Only landfill reports raise alerts. A landfill report at a crowded site
/// alerts even when it is itself marked Safe.
pub fn community_alert(reports: &[Report], report: &Report) -> Option<CommunityAlert> {
    if report.category != Category::Landfill {
        return None;
    }
    let location = report.location?;

    let reason = if report.status == ReportStatus::IllegalDumping
        && report.score.value() > ESCALATION_SCORE
    {
        AlertReason::HighConfidence
    } else {
        let flagged = flagged_nearby(reports, &location);
        if flagged >= CLUSTER_THRESHOLD {
            AlertReason::Cluster {
                flagged_nearby: flagged,
            }
        } else {
            return None;
        }
    };

    Some(CommunityAlert {
        report_id: report.id.clone(),
        location,
        reason,
    })
}

/// Every alert in the set, in report order
pub fn alerts(reports: &[Report]) -> Vec<CommunityAlert> {
    reports
        .iter()
        .filter_map(|r| community_alert(reports, r))
        .collect()
}

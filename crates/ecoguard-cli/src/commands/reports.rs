//! Report listing, stats and alert views

use crate::error::CliResult;
use crate::output::{self, print_warning, toned, OutputFormat};
use clap::Args;
use ecoguard_triage::{AlertReason, DispatchState, ReportFilter, TriageDesk, TriageStats};
use ecoguard_types::{Category, Report, ReportId, Severity};
use serde::Serialize;
use tabled::Tabled;

/// Filter flags shared by listing commands
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Category (landfill, deforestation, all)
    #[arg(short, long, default_value = "all")]
    pub category: String,

    /// Producer status label, case-insensitive (e.g. "Illegal Dumping", all)
    #[arg(short, long, default_value = "all")]
    pub status: String,

    /// Severity bucket (low, medium, high, critical, all)
    #[arg(short = 'S', long, default_value = "all")]
    pub severity: String,

    /// Free-text search over id, coordinates and category
    #[arg(short = 'q', long, default_value = "")]
    pub search: String,
}

impl FilterArgs {
    pub fn to_filter(&self) -> CliResult<ReportFilter> {
        Ok(ReportFilter::from_labels(
            &self.category,
            &self.status,
            &self.severity,
            &self.search,
        )?)
    }
}

/// Table row for report display
#[derive(Debug, Serialize, Tabled)]
pub struct ReportRow {
    pub id: String,
    pub category: String,
    pub severity: String,
    pub status: String,
    pub score: String,
    pub location: String,
    pub dispatch: String,
    pub reported: String,
}

impl ReportRow {
    pub fn new(report: &Report, state: DispatchState) -> Self {
        Self {
            id: report.id.to_string(),
            category: report.category.to_string(),
            severity: report.severity().label().to_string(),
            status: report.status.to_string(),
            score: format!("{:.2}", report.score.value()),
            location: format_location(report),
            dispatch: match state {
                DispatchState::Dispatched => "Dispatched".to_string(),
                DispatchState::AwaitingCommand => "Awaiting".to_string(),
            },
            reported: report.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub fn format_location(report: &Report) -> String {
    match report.location {
        Some(c) => format!("{:.4}, {:.4}", c.lat, c.lng),
        None => "-".to_string(),
    }
}

#[derive(Debug, Serialize, Tabled)]
struct MetricRow {
    metric: String,
    value: usize,
}

fn metric_rows(stats: &TriageStats) -> Vec<MetricRow> {
    let mut rows = vec![MetricRow {
        metric: "total".into(),
        value: stats.total,
    }];
    rows.extend(Category::ALL.iter().map(|c| MetricRow {
        metric: c.to_string(),
        value: stats.category(*c),
    }));
    rows.extend(Severity::ALL.iter().map(|s| MetricRow {
        metric: format!("severity: {}", s.as_str()),
        value: stats.severity(*s),
    }));
    rows.push(MetricRow {
        metric: "critical".into(),
        value: stats.critical,
    });
    rows.push(MetricRow {
        metric: "dispatched".into(),
        value: stats.dispatched,
    });
    rows.push(MetricRow {
        metric: "pending".into(),
        value: stats.pending,
    });
    rows
}

#[derive(Debug, Serialize, Tabled)]
struct AlertRow {
    report: String,
    location: String,
    reason: String,
}

#[derive(Debug, Serialize, Tabled)]
struct RejectionRow {
    position: usize,
    id: String,
    reason: String,
}

/// Detail view of one report
#[derive(Debug, Serialize)]
struct ReportDetail<'a> {
    report: &'a Report,
    severity: Severity,
    dispatch: DispatchState,
    dispatched_by: Option<String>,
    dispatched_at: Option<String>,
}

/// Print reports matching `filter`
pub async fn list(desk: &TriageDesk, filter: &ReportFilter, format: OutputFormat) -> CliResult<()> {
    let reports = desk.reports(filter).await?;
    let mut rows = Vec::with_capacity(reports.len());
    for report in &reports {
        rows.push(ReportRow::new(report, desk.dispatch_state(&report.id).await?));
    }
    output::print_output(rows, format)
}

pub async fn show(desk: &TriageDesk, id: &ReportId, format: OutputFormat) -> CliResult<()> {
    let report = desk.report(id).await?;
    let record = desk.dispatch_record(id).await?;
    let severity = report.severity();

    if format == OutputFormat::Table {
        println!("Report:    {}", report.id);
        println!("Category:  {}", report.category);
        println!(
            "Severity:  {} (score {:.4})",
            toned(severity.label(), severity.tone()),
            report.score.value()
        );
        println!("Status:    {}", report.status);
        println!("Location:  {}", format_location(&report));
        println!("Reported:  {}", report.timestamp.to_rfc3339());
        if let Some(path) = &report.image_path {
            println!("Evidence:  {}", path);
        }
        match &record {
            Some(r) => println!(
                "Dispatch:  dispatched at {} by {}",
                r.dispatched_at.format("%Y-%m-%d %H:%M:%S"),
                r.dispatched_by.as_deref().unwrap_or("unknown")
            ),
            None => println!("Dispatch:  awaiting command"),
        }
        return Ok(());
    }

    let detail = ReportDetail {
        report: &report,
        severity,
        dispatch: if record.is_some() {
            DispatchState::Dispatched
        } else {
            DispatchState::AwaitingCommand
        },
        dispatched_by: record.as_ref().and_then(|r| r.dispatched_by.clone()),
        dispatched_at: record.as_ref().map(|r| r.dispatched_at.to_rfc3339()),
    };
    output::print_single(&detail, format)
}

pub async fn stats(desk: &TriageDesk, format: OutputFormat) -> CliResult<()> {
    let stats = desk.stats().await?;
    match format {
        OutputFormat::Table => output::print_output(metric_rows(&stats), format),
        _ => output::print_single(&stats, format),
    }
}

pub async fn alerts(desk: &TriageDesk, format: OutputFormat) -> CliResult<()> {
    let alerts = desk.alerts().await?;
    if format == OutputFormat::Table && !alerts.is_empty() {
        print_warning(&format!("{} site(s) need a community alert", alerts.len()));
    }
    let rows = alerts
        .into_iter()
        .map(|a| AlertRow {
            report: a.report_id.to_string(),
            location: format!("{:.4}, {:.4}", a.location.lat, a.location.lng),
            reason: match a.reason {
                AlertReason::HighConfidence => "confident illegal dumping".to_string(),
                AlertReason::Cluster { flagged_nearby } => {
                    format!("{} flagged reports at this site", flagged_nearby)
                }
            },
        })
        .collect();
    output::print_output::<AlertRow>(rows, format)
}

pub async fn rejections(desk: &TriageDesk, format: OutputFormat) -> CliResult<()> {
    let rows = desk
        .rejections()
        .await?
        .into_iter()
        .map(|r| RejectionRow {
            position: r.position,
            id: r.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            reason: r.reason,
        })
        .collect();
    output::print_output::<RejectionRow>(rows, format)
}

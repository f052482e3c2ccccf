//! Producer health check

use crate::error::CliResult;
use crate::output::{self, print_success, OutputFormat};
use colored::*;
use ecoguard_triage::TriageDesk;

pub async fn execute(desk: &TriageDesk, endpoint: &str, format: OutputFormat) -> CliResult<()> {
    let health = desk.health().await?;

    if format != OutputFormat::Table {
        return output::print_single(&health, format);
    }

    if health.is_healthy() {
        print_success(&format!("Producer at {} is healthy", endpoint));
    } else {
        println!("{} Producer at {} reports {}", "⚠".yellow(), endpoint, health.status.yellow());
    }
    if let Some(device) = &health.device {
        println!("  Device: {}", device);
    }
    Ok(())
}

//! Report deletion with confirmation

use crate::error::CliResult;
use crate::output::{print_error, print_success};
use ecoguard_triage::{CancellationToken, TriageDesk};
use ecoguard_types::ReportId;

/// Delete a report after the operator confirms.
///
/// Returns whether the report was deleted.
pub async fn execute(
    desk: &TriageDesk,
    id: &ReportId,
    yes: bool,
    cancel: &CancellationToken,
) -> CliResult<bool> {
    if !yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete report {}? This removes it at the producer and cannot be undone.",
                id
            ))
            .default(false)
            .interact()?;

        if !confirm {
            print_error("Aborted");
            return Ok(false);
        }
    }

    desk.delete_with(id, cancel).await?;
    print_success(&format!("Deleted report: {}", id));
    Ok(true)
}

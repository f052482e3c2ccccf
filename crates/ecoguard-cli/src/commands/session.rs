//! Interactive operator session
//!
//! Dispatch decisions only live as long as the process, so this is where an
//! operator actually triages: load once, then filter, inspect and dispatch.

use super::{delete, reports, Interrupt};
use crate::error::CliResult;
use crate::output::{print_error, print_info, print_success, print_warning, OutputFormat};
use ecoguard_triage::{DispatchOutcome, ReportFilter, TriageDesk};
use ecoguard_types::ReportId;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  refresh                      reload reports from the producer
  list [key=value ...]         list reports; keys: category, status, severity, search
  show <id>                    show one report
  dispatch <id>                mark a report as dispatched
  delete <id> [-y]             delete a report at the producer
  stats                        summary counters
  alerts                       community alerts
  rejected                     records refused by the last load
  help                         this text
  quit                         leave the session";

/// One line of operator input
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Refresh,
    List(ReportFilter),
    Show(ReportId),
    Dispatch(ReportId),
    Delete { id: ReportId, yes: bool },
    Stats,
    Alerts,
    Rejected,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "refresh" | "r" => SessionCommand::Refresh,
            "list" | "ls" => SessionCommand::List(parse_filter(&rest)?),
            "show" => SessionCommand::Show(single_id(verb, &rest)?),
            "dispatch" => SessionCommand::Dispatch(single_id(verb, &rest)?),
            "delete" | "rm" => {
                let yes = rest.iter().any(|w| *w == "-y" || *w == "--yes");
                let ids: Vec<&str> = rest
                    .iter()
                    .copied()
                    .filter(|w| *w != "-y" && *w != "--yes")
                    .collect();
                SessionCommand::Delete {
                    id: single_id(verb, &ids)?,
                    yes,
                }
            }
            "stats" => SessionCommand::Stats,
            "alerts" => SessionCommand::Alerts,
            "rejected" => SessionCommand::Rejected,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            other => return Err(format!("unknown command `{}`, try `help`", other)),
        };
        Ok(Some(command))
    }
}

fn single_id(verb: &str, args: &[&str]) -> Result<ReportId, String> {
    match args {
        [id] => Ok(ReportId::new(*id)),
        _ => Err(format!("usage: {} <id>", verb)),
    }
}

// `status=illegal dumping` keeps unkeyed words with the previous value
fn parse_filter(args: &[&str]) -> Result<ReportFilter, String> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for word in args {
        match word.split_once('=') {
            Some((key, value)) => pairs.push((key.to_ascii_lowercase(), value.to_string())),
            None => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(format!("expected key=value, got `{}`", word)),
            },
        }
    }

    let (mut category, mut status, mut severity, mut search) =
        ("all", "all", "all", "");
    for (key, value) in &pairs {
        match key.as_str() {
            "category" => category = value.as_str(),
            "status" => status = value.as_str(),
            "severity" => severity = value.as_str(),
            "search" => search = value.as_str(),
            other => return Err(format!("unknown filter `{}`", other)),
        }
    }
    ReportFilter::from_labels(category, status, severity, search).map_err(|e| e.to_string())
}

/// Run the read-eval loop until `quit` or end of input
pub async fn run(desk: &TriageDesk, format: OutputFormat) -> CliResult<()> {
    print_info(&format!(
        "Triage session for {} ({}). Type `help` for commands.",
        desk.claim().subject(),
        desk.claim().role()
    ));
    if let Err(e) = execute(desk, SessionCommand::Refresh, format).await {
        print_warning(&format!("Initial load failed: {}", e));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("ecoguard> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                print_error(&message);
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        if let Err(e) = execute(desk, command, format).await {
            print_error(&e.to_string());
        }
    }

    let stats = desk.stats().await?;
    print_info(&format!(
        "Session closed with {} dispatched, {} pending",
        stats.dispatched, stats.pending
    ));
    Ok(())
}

async fn execute(desk: &TriageDesk, command: SessionCommand, format: OutputFormat) -> CliResult<()> {
    match command {
        SessionCommand::Refresh => {
            let interrupt = Interrupt::arm();
            let loaded = desk.refresh_with(interrupt.token()).await?;
            let rejected = desk.rejections().await?.len();
            if rejected > 0 {
                print_warning(&format!(
                    "Loaded {} reports, rejected {} (see `rejected`)",
                    loaded.len(),
                    rejected
                ));
            } else {
                print_success(&format!("Loaded {} reports", loaded.len()));
            }
            Ok(())
        }
        SessionCommand::List(filter) => reports::list(desk, &filter, format).await,
        SessionCommand::Show(id) => reports::show(desk, &id, format).await,
        SessionCommand::Dispatch(id) => {
            match desk.dispatch(&id).await? {
                DispatchOutcome::Dispatched => {
                    print_success(&format!("Response unit dispatched to report {}", id))
                }
                DispatchOutcome::AlreadyDispatched => {
                    print_info(&format!("Report {} is already dispatched", id))
                }
            }
            Ok(())
        }
        SessionCommand::Delete { id, yes } => {
            let interrupt = Interrupt::arm();
            delete::execute(desk, &id, yes, interrupt.token()).await?;
            Ok(())
        }
        SessionCommand::Stats => reports::stats(desk, format).await,
        SessionCommand::Alerts => reports::alerts(desk, format).await,
        SessionCommand::Rejected => reports::rejections(desk, format).await,
        SessionCommand::Help => {
            println!("{}", HELP);
            Ok(())
        }
        SessionCommand::Quit => Ok(()),
    }
}

//! EcoGuard CLI - operator terminal for incident triage
//!
//! Gives officials a terminal onto the report producer:
//! - List, filter and search reports
//! - Watch summary counters and community alerts
//! - Delete reports, with confirmation
//! - Run an interactive session to dispatch response units

use clap::{Parser, Subcommand};
use ecoguard_triage::{TriageConfig, TriageDesk};
use ecoguard_types::{OperatorClaim, ReportId, Role};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{delete, health, reports, session, Interrupt};
use error::CliResult;
use output::{print_error, OutputFormat};

/// EcoGuard CLI application
#[derive(Parser)]
#[command(name = "ecoguard")]
#[command(about = "EcoGuard - environmental incident triage and dispatch", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ECOGUARD_CONFIG")]
    config: Option<String>,

    /// Report producer base URL (overrides the configuration)
    #[arg(short, long, env = "ECOGUARD_ENDPOINT")]
    endpoint: Option<String>,

    /// Operator role, as verified by the surrounding login (user, official, admin)
    #[arg(long, env = "ECOGUARD_ROLE", default_value = "official")]
    role: Role,

    /// Operator identity recorded on dispatch decisions
    #[arg(long, env = "ECOGUARD_OPERATOR", default_value = "operator")]
    operator: String,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// List reports, optionally filtered
    #[command(alias = "ls")]
    Reports {
        #[command(flatten)]
        filter: reports::FilterArgs,
    },

    /// Show one report
    Show {
        /// Report ID
        id: String,
    },

    /// Summary counters over all reports
    Stats,

    /// Landfill sites that warrant a community alert
    Alerts,

    /// Records the producer sent that failed validation
    Rejected,

    /// Delete a report at the producer
    #[command(alias = "rm")]
    Delete {
        /// Report ID
        id: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check producer connectivity
    Health,

    /// Interactive triage session (dispatch lives here)
    Session,

    /// Show effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = TriageConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_base_url(endpoint.clone());
        config.validate()?;
    }

    init_tracing(&config, cli.verbose, cli.json_logs);
    tracing::debug!(endpoint = %config.producer.base_url, role = %cli.role, "Starting");

    let claim = OperatorClaim::verified(cli.operator.clone(), cli.role);
    let desk = TriageDesk::from_config(&config, claim)?;
    let format = cli.output;

    match cli.command {
        Commands::Reports { filter } => {
            let filter = filter.to_filter()?;
            load(&desk).await?;
            reports::list(&desk, &filter, format).await
        }
        Commands::Show { id } => {
            load(&desk).await?;
            reports::show(&desk, &ReportId::new(id), format).await
        }
        Commands::Stats => {
            load(&desk).await?;
            reports::stats(&desk, format).await
        }
        Commands::Alerts => {
            load(&desk).await?;
            reports::alerts(&desk, format).await
        }
        Commands::Rejected => {
            load(&desk).await?;
            reports::rejections(&desk, format).await
        }
        Commands::Delete { id, yes } => {
            let interrupt = Interrupt::arm();
            delete::execute(&desk, &ReportId::new(id), yes, interrupt.token()).await?;
            Ok(())
        }
        Commands::Health => health::execute(&desk, &config.producer.base_url, format).await,
        Commands::Session => session::run(&desk, format).await,
        Commands::Config => output::print_single(&config, format),
    }
}

async fn load(desk: &TriageDesk) -> CliResult<()> {
    let interrupt = Interrupt::arm();
    desk.refresh_with(interrupt.token()).await?;
    Ok(())
}

fn init_tracing(config: &TriageConfig, verbose: bool, json: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

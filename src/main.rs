//! Use Case Mapper CLI
//!
//! Terminal front end for the analysis pipeline:
//! - `analyze` runs the batched analysis and writes the report as JSON
//! - `overview` prints local statistics for an export
//! - `config` shows the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use usecase_mapper::commands::{self, analyze, overview, AnalyzeArgs, OverviewArgs};
use usecase_mapper::AppConfig;

/// Use Case Mapper CLI application
#[derive(Parser)]
#[command(name = "usecase-mapper")]
#[command(about = "Map customer conversations to use cases with an LLM", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "USECASE_MAPPER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Analyze a conversation export
    Analyze(AnalyzeArgs),

    /// Show report statistics without calling the provider
    Overview(OverviewArgs),

    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout carries only the report
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    // Load config
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze(args) => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(analyze::handle_interrupts(
                tokio::signal::ctrl_c,
                on_interrupt,
                || std::process::exit(130),
            ));
            analyze::execute(args, config, cancel).await?;
        }
        Commands::Overview(args) => overview::execute(args)?,
        Commands::Config => commands::show_config(&config, cli.config.as_deref())?,
    }
    Ok(())
}

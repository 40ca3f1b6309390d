//! CLI application for the sales pilot export.

mod asana;
mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, export};
use salespilot_core::{ConfigError, PilotError, SourceError};

/// Sales pilot - export project-management tasks as a canonical sales dataset
#[derive(Parser)]
#[command(name = "salespilot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export tasks of every listed project
    Export(export::ExportArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Exit code when the project list is missing.
const EXIT_NO_PROJECTS: u8 = 2;
/// Exit code when the task service fails.
const EXIT_SOURCE: u8 = 3;
/// Exit code for any other failure.
const EXIT_OTHER: u8 = 4;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {e}");
    }

    let result = match cli.command {
        Commands::Export(args) => export::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", style("✗").red(), err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<SourceError>().is_some() {
        return EXIT_SOURCE;
    }
    match err.downcast_ref::<PilotError>() {
        Some(PilotError::Config(ConfigError::MissingProjects(_))) => EXIT_NO_PROJECTS,
        Some(PilotError::Source(_)) => EXIT_SOURCE,
        _ => EXIT_OTHER,
    }
}

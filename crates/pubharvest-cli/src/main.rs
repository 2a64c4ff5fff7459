//! pubharvest - PubMed XML to relational store
//!
//! Streams PubMed exports, keeps articles that carry a PMID, title, abstract,
//! journal and year, and loads them into a DuckDB table.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pubharvest_core::{ProgressContext, SharedProgress};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "pubharvest")]
#[command(about = "Extract PubMed publications into a relational store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./pubharvest.toml or ~/.config/pubharvest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract publications from XML exports into the database
    Extract(cmd::extract::ExtractArgs),
    /// Show row counts per publication year
    Stats(cmd::stats::StatsArgs),
    /// Print one stored publication
    Show(cmd::show::ShowArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress: SharedProgress = Arc::new(ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug; progress bars show activity
    //   non-TTY: info unless --debug; logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    pubharvest_core::init_logging(quiet, cli.debug, multi);

    pubharvest_core::install_signal_handlers().context("Failed to install signal handlers")?;

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Extract(args) => cmd::extract::run(args, &config, &progress),
        Command::Stats(args) => cmd::stats::run(args, &config).map(|()| ExitCode::SUCCESS),
        Command::Show(args) => cmd::show::run(args, &config).map(|()| ExitCode::SUCCESS),
        Command::Config => {
            cmd::print_summary(
                "Setting",
                &[
                    ("Input directory", config.input.dir.display().to_string()),
                    (
                        "Max files",
                        config
                            .input
                            .max_files
                            .map_or_else(|| "all".to_string(), |n| n.to_string()),
                    ),
                    ("Database", config.database.path.display().to_string()),
                    ("Reset on extract", config.database.reset.to_string()),
                ],
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

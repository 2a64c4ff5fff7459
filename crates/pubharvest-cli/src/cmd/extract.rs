//! Extract subcommand - load PubMed XML exports into the database

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use pubharvest_core::{INTERRUPTED_EXIT, MemorySink, ProgressContext, fmt_num, pct};
use pubharvest_db::Database;
use pubharvest_pubmed::Summary;

use super::print_summary;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Directory with *.xml / *.xml.gz exports (default: from config)
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// DuckDB database file (default: from config)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Clear the publications table before extracting
    #[arg(long)]
    pub reset: bool,

    /// Maximum number of files to process
    #[arg(short = 'l', long)]
    pub max_files: Option<usize>,

    /// Parse and count without writing to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ExtractArgs, config: &Config, progress: &ProgressContext) -> Result<ExitCode> {
    let summary = execute(args, config, progress)?;
    Ok(ExitCode::from(exit_status(&summary)))
}

fn execute(args: ExtractArgs, config: &Config, progress: &ProgressContext) -> Result<Summary> {
    let pm_config = pubharvest_pubmed::Config {
        input_dir: args
            .input_dir
            .unwrap_or_else(|| config.input.dir.clone()),
        max_files: args.max_files.or(config.input.max_files),
    };
    let db_path = args.db.unwrap_or_else(|| config.database.path.clone());
    let reset = args.reset || config.database.reset;

    log::info!("Extracting PubMed publications");
    log::info!("  Input: {}", pm_config.input_dir.display());

    let summary = if args.dry_run {
        log::info!("  Dry run: nothing is written");
        if reset {
            log::warn!("--reset ignored in dry-run mode");
        }
        let mut sink = MemorySink::new();
        pubharvest_pubmed::run(&pm_config, &mut sink, progress)?
    } else {
        log::info!("  Database: {}", db_path.display());
        let mut db = Database::open(&db_path)?;
        db.create_schema()?;
        if reset {
            db.clear()?;
        }
        let summary = pubharvest_pubmed::run(&pm_config, &mut db, progress)?;
        log::info!("Database now holds {} publications", db.count()?);
        summary
    };

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        println!("{json}");
    } else {
        print_extract_summary(&summary);
    }
    if summary.interrupted {
        progress.println("Interrupted before all files were processed.");
    }

    Ok(summary)
}

fn print_extract_summary(summary: &Summary) {
    let stats = &summary.stats;
    print_summary(
        "PubMed",
        &[
            (
                "Files",
                format!(
                    "{}/{} ({} failed)",
                    summary.completed_files, summary.total_files, summary.failed_files
                ),
            ),
            ("Articles", fmt_num(stats.articles)),
            (
                "Inserted",
                format!(
                    "{} ({:.1}%)",
                    fmt_num(stats.inserted),
                    pct(stats.inserted, stats.articles)
                ),
            ),
            ("Incomplete", fmt_num(stats.incomplete)),
            ("Duplicate", fmt_num(stats.duplicates)),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );
}

/// 130 when interrupted, 1 when any file failed, 0 otherwise
fn exit_status(summary: &Summary) -> u8 {
    if summary.interrupted {
        INTERRUPTED_EXIT
    } else if summary.failed_files > 0 {
        1
    } else {
        0
    }
}

//! Main runner: every input file, one after another

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use pubharvest_core::{ProgressContext, RecordStore, fmt_num, is_shutdown_requested, pct};
use serde::{Serialize, Serializer};

use crate::config::Config;
use crate::extract::ExtractStats;
use crate::worker::{self, FileOutcome};

/// File that was skipped as a whole
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Run summary, accumulated across files
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub total_files: usize,
    pub completed_files: usize,
    pub failed_files: usize,
    /// Stopped early on a shutdown request
    pub interrupted: bool,
    #[serde(flatten)]
    pub stats: ExtractStats,
    pub failures: Vec<FailedFile>,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl Summary {
    /// Units not persisted (incomplete or duplicate)
    pub fn skipped(&self) -> usize {
        self.stats.skipped()
    }

    fn record(&mut self, path: &Path, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Completed(stats) => {
                self.completed_files += 1;
                self.stats += stats;
            }
            FileOutcome::Failed(reason) => {
                self.failed_files += 1;
                self.failures.push(FailedFile {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        }
    }

    /// Log summary lines (non-TTY and TTY alike)
    pub fn log(&self) {
        log::info!("=== Extraction Summary ===");
        log::info!(
            "Files: {}/{} completed ({} failed)",
            self.completed_files,
            self.total_files,
            self.failed_files
        );
        log::info!("Total number of publications found: {}", fmt_num(self.stats.articles));
        log::info!(
            "Inserted: {} ({:.1}%)",
            fmt_num(self.stats.inserted),
            pct(self.stats.inserted, self.stats.articles)
        );
        log::info!(
            "Skipped: {} ({} incomplete, {} duplicate)",
            fmt_num(self.skipped()),
            fmt_num(self.stats.incomplete),
            fmt_num(self.stats.duplicates)
        );
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());

        if self.stats.articles > 0 && !self.elapsed.is_zero() {
            let rate = self.stats.articles as f64 / self.elapsed.as_secs_f64();
            log::info!("Throughput: {:.0} articles/sec", rate);
        }
        for failed in &self.failures {
            log::warn!("Failed: {}: {}", failed.path.display(), failed.reason);
        }
    }
}

/// List `*.xml` and `*.xml.gz` files in `dir`, sorted by name.
pub fn discover_files(dir: &Path, max_files: Option<usize>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Input directory not found: {}", dir.display());
    }

    let mut files = Vec::new();
    for pattern in ["*.xml", "*.xml.gz"] {
        let full = dir.join(pattern);
        let full_str = full.to_string_lossy();
        let paths = glob::glob(&full_str)
            .with_context(|| format!("Invalid glob pattern: {full_str}"))?;
        files.extend(paths.filter_map(|p| p.ok()).filter(|p| p.is_file()));
    }
    files.sort();
    files.dedup();

    if let Some(limit) = max_files {
        files.truncate(limit);
    }
    Ok(files)
}

/// Run extraction over every input file against `store`.
///
/// Files are processed in name order, each in its own transaction. A
/// malformed file is counted and skipped; a store failure aborts the run.
pub fn run<S: RecordStore>(
    config: &Config,
    store: &mut S,
    progress: &ProgressContext,
) -> Result<Summary> {
    let start = Instant::now();

    let files = discover_files(&config.input_dir, config.max_files)?;
    if files.is_empty() {
        log::warn!("No XML files found in {}", config.input_dir.display());
    } else {
        log::info!(
            "Processing {} files from {}",
            files.len(),
            config.input_dir.display()
        );
    }

    let mut summary = Summary {
        total_files: files.len(),
        ..Default::default()
    };

    for path in &files {
        if is_shutdown_requested() {
            log::warn!("Shutdown requested, stopping before {}", path.display());
            summary.interrupted = true;
            break;
        }
        let outcome = worker::process_file(path, store, progress)?;
        summary.record(path, outcome);
    }

    summary.elapsed = start.elapsed();
    summary.log();
    Ok(summary)
}

//! Subcommands

pub mod extract;
pub mod show;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use pubharvest_db::Database;

use crate::config::Config;

/// Database location shared by the read-only subcommands
#[derive(Args, Debug)]
pub struct DbArgs {
    /// DuckDB database file (default: from config)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

impl DbArgs {
    pub fn path(&self, config: &Config) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| config.database.path.clone())
    }
}

/// Open a database that an earlier `extract` run must have created.
pub fn open_existing(path: &Path) -> Result<Database> {
    if !path.exists() {
        anyhow::bail!(
            "Database not found: {} (run `pubharvest extract` first)",
            path.display()
        );
    }
    Database::open(path)
}

/// Two-column table with a cyan header
pub fn table(left: &str, right: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(left).fg(Color::Cyan),
            Cell::new(right).fg(Color::Cyan),
        ]);
    table
}

/// Print a key-value summary table on stderr
pub fn print_summary(title: &str, rows: &[(&str, String)]) {
    let mut t = table(title, "Value");
    for (label, value) in rows {
        t.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    eprintln!("\n{t}");
}

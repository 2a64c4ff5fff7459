//! Stats subcommand - row counts per publication year

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, CellAlignment};
use pubharvest_core::fmt_num;

use super::{DbArgs, open_existing, table};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

pub fn run(args: StatsArgs, config: &Config) -> Result<()> {
    let path = args.db.path(config);
    let db = open_existing(&path)?;
    let years = db.year_counts()?;
    let total = db.count()?;

    let mut t = table("Year", "Publications");
    for (year, n) in &years {
        t.add_row(vec![
            Cell::new(year),
            Cell::new(fmt_num(*n as usize)).set_alignment(CellAlignment::Right),
        ]);
    }
    t.add_row(vec![
        Cell::new("Total"),
        Cell::new(fmt_num(total as usize)).set_alignment(CellAlignment::Right),
    ]);

    println!("{}", path.display());
    println!("{t}");
    Ok(())
}

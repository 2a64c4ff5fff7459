//! Show subcommand - print one stored publication

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, ContentArrangement};
use pubharvest_core::{Field, PublicationRecord};

use super::{DbArgs, open_existing, table};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// PubMed identifier
    pub pmid: String,

    #[command(flatten)]
    pub db: DbArgs,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ShowArgs, config: &Config) -> Result<()> {
    let db = open_existing(&args.db.path(config))?;
    let Some(record) = db.get(&args.pmid)? else {
        anyhow::bail!("PMID {} not found", args.pmid);
    };

    if args.json {
        let json = serde_json::to_string_pretty(&record).context("Failed to encode record")?;
        println!("{json}");
        return Ok(());
    }

    let record = PublicationRecord::from(record);
    let mut t = table("Field", "Value");
    t.set_content_arrangement(ContentArrangement::Dynamic);
    for field in Field::ALL {
        t.add_row(vec![
            Cell::new(field.name()),
            Cell::new(record.get(field).unwrap_or_default()),
        ]);
    }
    println!("{t}");
    Ok(())
}

//! Pubharvest PubMed - streaming extraction from PubMed XML exports
//!
//! Reads `PubmedArticleSet` documents (plain or gzipped), pulls five fields
//! out of every `<PubmedArticle>` and hands complete records to a
//! [`RecordStore`](pubharvest_core::RecordStore).
//!
//! # Example
//!
//! ```ignore
//! use pubharvest_core::{MemorySink, ProgressContext};
//! use pubharvest_pubmed::{Config, run};
//!
//! let config = Config {
//!     input_dir: "data/raw".into(),
//!     max_files: Some(1),
//! };
//!
//! let mut store = MemorySink::new();
//! let summary = run(&config, &mut store, &ProgressContext::hidden())?;
//! println!("Inserted {} of {} articles", summary.stats.inserted, summary.stats.articles);
//! ```

pub mod config;
pub mod extract;
pub mod fields;
pub mod parser;
pub mod runner;
pub mod source;
pub mod worker;

// Re-exports
pub use config::Config;
pub use extract::{ExtractError, ExtractStats, extract};
pub use fields::FieldMap;
pub use parser::{ArticleStream, ParseError};
pub use runner::{Summary, discover_files, run};

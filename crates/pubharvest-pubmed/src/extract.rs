//! Extraction loop: route each record to the sink or the skipped count

use pubharvest_core::{InsertOutcome, PublicationRecord, RecordSink};
use serde::Serialize;

use crate::parser::ParseError;

/// Per-file extraction counts.
///
/// `articles` counts every unit seen; `inserted + skipped() == articles`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub articles: usize,
    pub inserted: usize,
    pub incomplete: usize,
    pub duplicates: usize,
}

impl ExtractStats {
    /// Units not persisted, for either reason
    pub fn skipped(&self) -> usize {
        self.incomplete + self.duplicates
    }
}

impl std::ops::AddAssign for ExtractStats {
    fn add_assign(&mut self, rhs: Self) {
        self.articles += rhs.articles;
        self.inserted += rhs.inserted;
        self.incomplete += rhs.incomplete;
        self.duplicates += rhs.duplicates;
    }
}

/// Why an extraction run stopped early
#[derive(Debug)]
pub enum ExtractError {
    /// Source document is malformed; the whole file is void
    Source(ParseError),
    /// Sink failed fatally; callers should abort
    Sink(anyhow::Error),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(e) => write!(f, "{e}"),
            Self::Sink(e) => write!(f, "sink error: {e:#}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Sink(e) => Some(&**e),
        }
    }
}

/// Drain extraction attempts (usually an [`ArticleStream`](crate::parser::ArticleStream))
/// into `sink`, one unit at a time.
///
/// Each record is dropped before the next unit is read.
pub fn extract<I, S>(records: I, mut sink: S) -> Result<ExtractStats, ExtractError>
where
    I: IntoIterator<Item = Result<PublicationRecord, ParseError>>,
    S: RecordSink,
{
    let mut stats = ExtractStats::default();

    for item in records {
        let record = item.map_err(ExtractError::Source)?;
        stats.articles += 1;

        let complete = match record.into_complete() {
            Ok(complete) => complete,
            Err(partial) => {
                log::debug!(
                    "skipping incomplete article {}: missing {:?}",
                    partial.identifier.as_deref().unwrap_or("<no id>"),
                    partial.missing_fields()
                );
                stats.incomplete += 1;
                continue;
            }
        };

        match sink.insert(&complete).map_err(ExtractError::Sink)? {
            InsertOutcome::Inserted => stats.inserted += 1,
            InsertOutcome::Duplicate => {
                log::debug!("skipping duplicate article {}", complete.identifier);
                stats.duplicates += 1;
            }
        }
    }

    Ok(stats)
}

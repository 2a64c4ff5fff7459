//! Worker for processing one PubMed XML file

use std::path::Path;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use pubharvest_core::{FileSink, ProgressContext, RecordStore, fmt_num};

use crate::extract::{ExtractError, ExtractStats, extract};
use crate::fields::FieldMap;
use crate::parser::ArticleStream;
use crate::source::open_source;

/// Progress update interval (every N articles)
const UPDATE_INTERVAL: usize = 1_000;

/// What happened to one input file
#[derive(Debug)]
pub enum FileOutcome {
    /// Parsed to the end; its inserts are committed
    Completed(ExtractStats),
    /// Unreadable or malformed; nothing from it was persisted
    Failed(String),
}

/// Process a single file inside its own store transaction.
///
/// A malformed or unreadable source is reported as [`FileOutcome::Failed`]
/// after rolling back. Store failures are returned as `Err`.
pub fn process_file<S: RecordStore>(
    path: &Path,
    store: &mut S,
    progress: &ProgressContext,
) -> Result<FileOutcome> {
    let name = display_name(path);

    let source = match open_source(path) {
        Ok(source) => source,
        Err(e) => {
            log::error!("{name}: {e:#}; file skipped");
            return Ok(FileOutcome::Failed(format!("{e:#}")));
        }
    };

    let pb = progress.file_bar(&name, source.total_bytes);
    let counter = source.counter.clone();
    let mut seen = 0usize;
    let records = ArticleStream::new(source.reader, FieldMap::pubmed()).inspect(|_| {
        seen += 1;
        if seen.is_multiple_of(UPDATE_INTERVAL) {
            pb.set_position(counter.load(Ordering::Relaxed));
            pb.set_message(format!("{} articles", fmt_num(seen)));
        }
    });

    let mut sink = store
        .begin_file()
        .with_context(|| format!("{name}: failed to begin transaction"))?;
    let result = extract(records, &mut sink);
    pb.finish_and_clear();

    match result {
        Ok(stats) => {
            sink.commit()
                .with_context(|| format!("{name}: failed to commit"))?;
            log::info!(
                "{name}: {} articles, {} inserted, {} incomplete, {} duplicate",
                fmt_num(stats.articles),
                fmt_num(stats.inserted),
                fmt_num(stats.incomplete),
                fmt_num(stats.duplicates),
            );
            Ok(FileOutcome::Completed(stats))
        }
        Err(ExtractError::Source(e)) => {
            sink.rollback()
                .with_context(|| format!("{name}: failed to roll back"))?;
            log::error!("{name}: {e}; file skipped");
            Ok(FileOutcome::Failed(e.to_string()))
        }
        Err(ExtractError::Sink(e)) => {
            if let Err(rb) = sink.rollback() {
                log::warn!("{name}: rollback after sink failure also failed: {rb:#}");
            }
            Err(e.context(format!("{name}: store failure")))
        }
    }
}

/// File name for logs and progress bars, falling back to the full path
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubharvest_core::MemorySink;
    use tempfile::TempDir;

    const GOOD: &str = "<PubmedArticleSet><PubmedArticle><MedlineCitation><PMID>1</PMID><Article>\
        <Journal><JournalIssue><PubDate><Year>2020</Year></PubDate></JournalIssue><Title>J</Title></Journal>\
        <ArticleTitle>T</ArticleTitle><Abstract><AbstractText>A</AbstractText></Abstract>\
        </Article></MedlineCitation></PubmedArticle></PubmedArticleSet>";

    #[test]
    fn display_name_uses_file_name() {
        assert_eq!(
            display_name(Path::new("/data/raw/pubmed26n0001.xml.gz")),
            "pubmed26n0001.xml.gz"
        );
    }

    #[test]
    fn completed_file_is_committed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("good.xml");
        std::fs::write(&path, GOOD).unwrap();

        let mut store = MemorySink::new();
        let outcome = process_file(&path, &mut store, &ProgressContext::hidden()).unwrap();
        match outcome {
            FileOutcome::Completed(stats) => assert_eq!(stats.inserted, 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn malformed_file_is_rolled_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.xml");
        // Complete first article, then truncated
        let truncated = GOOD.strip_suffix("</PubmedArticleSet>").unwrap();
        std::fs::write(&path, truncated).unwrap();

        let mut store = MemorySink::new();
        let outcome = process_file(&path, &mut store, &ProgressContext::hidden()).unwrap();
        assert!(matches!(outcome, FileOutcome::Failed(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn missing_file_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut store = MemorySink::new();
        let outcome = process_file(
            &dir.path().join("gone.xml"),
            &mut store,
            &ProgressContext::hidden(),
        )
        .unwrap();
        assert!(matches!(outcome, FileOutcome::Failed(_)));
    }
}

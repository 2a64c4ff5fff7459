//! pubharvest-db: DuckDB-backed publication store
//!
//! One `publications` table keyed by PMID. Extraction writes through a
//! [`FileTransaction`] per source file, so a file that fails part-way leaves
//! no rows behind.

mod sql;

use std::path::Path;

use anyhow::{Context, Result};
use duckdb::{Connection, Transaction, params};
use pubharvest_core::{CompleteRecord, FileSink, InsertOutcome, RecordSink, RecordStore};

pub use sql::TABLE;

/// Handle to the publications database
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database file, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database dir: {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open DuckDB database: {}", path.display()))?;
        log::debug!("Opened database {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open DuckDB in-memory connection")?;
        Ok(Self { conn })
    }

    /// Create the publications table if it does not exist.
    pub fn create_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(&sql::create_table())
            .context("Failed to create publications table")
    }

    /// Delete every row; returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let removed = self
            .conn
            .execute(&sql::delete_all(), [])
            .context("Failed to clear publications table")?;
        log::info!("Cleared {removed} rows from {TABLE}");
        Ok(removed)
    }

    /// Start a transaction scoped to one source file.
    pub fn begin_file(&mut self) -> Result<FileTransaction<'_>> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin transaction")?;
        Ok(FileTransaction { tx })
    }

    pub fn count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row(&sql::count(), [], |row| row.get(0))
            .context("Failed to count publications")?;
        Ok(n as u64)
    }

    /// Look up one stored publication by PMID.
    pub fn get(&self, pmid: &str) -> Result<Option<CompleteRecord>> {
        let mut stmt = self
            .conn
            .prepare(&sql::select_one())
            .context("Failed to prepare lookup")?;
        let mut rows = stmt
            .query_map(params![pmid], |row| {
                Ok(CompleteRecord {
                    identifier: row.get(0)?,
                    title: row.get(1)?,
                    abstract_text: row.get(2)?,
                    journal: row.get(3)?,
                    publication_year: row.get(4)?,
                })
            })
            .with_context(|| format!("Failed to look up PMID {pmid}"))?;
        rows.next()
            .transpose()
            .with_context(|| format!("Failed to read row for PMID {pmid}"))
    }

    /// Row counts per publication year, ordered by year text.
    pub fn year_counts(&self) -> Result<Vec<(String, u64)>> {
        let mut stmt = self
            .conn
            .prepare(&sql::year_counts())
            .context("Failed to prepare year counts")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })
            .context("Failed to query year counts")?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to read year counts")
    }
}

impl RecordStore for Database {
    type File<'a> = FileTransaction<'a>;

    fn begin_file(&mut self) -> Result<FileTransaction<'_>> {
        Database::begin_file(self)
    }
}

/// Open transaction for one source file.
///
/// Dropping it without [`FileSink::commit`] rolls back.
pub struct FileTransaction<'a> {
    tx: Transaction<'a>,
}

impl RecordSink for FileTransaction<'_> {
    fn insert(&mut self, record: &CompleteRecord) -> Result<InsertOutcome> {
        let existing: i64 = self
            .tx
            .prepare_cached(&sql::exists())
            .context("Failed to prepare existence check")?
            .query_row(params![record.identifier], |row| row.get(0))
            .with_context(|| format!("Failed to check PMID {}", record.identifier))?;
        if existing > 0 {
            return Ok(InsertOutcome::Duplicate);
        }

        self.tx
            .prepare_cached(&sql::insert())
            .context("Failed to prepare insert")?
            .execute(params![
                record.identifier,
                record.title,
                record.abstract_text,
                record.journal,
                record.publication_year,
            ])
            .with_context(|| format!("Failed to insert PMID {}", record.identifier))?;
        Ok(InsertOutcome::Inserted)
    }
}

impl FileSink for FileTransaction<'_> {
    fn commit(self) -> Result<()> {
        self.tx.commit().context("Failed to commit transaction")
    }

    fn rollback(self) -> Result<()> {
        self.tx.rollback().context("Failed to roll back transaction")
    }
}

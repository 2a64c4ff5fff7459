//! Record sinks: where complete publications go

use std::collections::BTreeMap;

use crate::record::CompleteRecord;

/// Result of handing a record to a sink.
///
/// A duplicate key is an ordinary outcome, not an error: the extraction loop
/// keeps going and counts it as skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// Persistence target for complete records, keyed by identifier.
///
/// `Err` is reserved for fatal sink failures (lost connection, disk full) and
/// is propagated by callers.
pub trait RecordSink {
    fn insert(&mut self, record: &CompleteRecord) -> anyhow::Result<InsertOutcome>;
}

/// A sink scoped to one source file: everything inserted through it becomes
/// visible on [`FileSink::commit`] and is discarded on [`FileSink::rollback`].
pub trait FileSink: RecordSink {
    fn commit(self) -> anyhow::Result<()>;
    fn rollback(self) -> anyhow::Result<()>;
}

/// Store that hands out one [`FileSink`] per source file.
pub trait RecordStore {
    type File<'a>: FileSink
    where
        Self: 'a;

    fn begin_file(&mut self) -> anyhow::Result<Self::File<'_>>;
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn insert(&mut self, record: &CompleteRecord) -> anyhow::Result<InsertOutcome> {
        (**self).insert(record)
    }
}

/// In-memory sink with the same uniqueness rule as the database table
#[derive(Debug, Default)]
pub struct MemorySink {
    records: BTreeMap<String, CompleteRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&CompleteRecord> {
        self.records.get(identifier)
    }

    /// Records in identifier order
    pub fn records(&self) -> impl Iterator<Item = &CompleteRecord> {
        self.records.values()
    }
}

impl RecordSink for MemorySink {
    fn insert(&mut self, record: &CompleteRecord) -> anyhow::Result<InsertOutcome> {
        if self.records.contains_key(&record.identifier) {
            return Ok(InsertOutcome::Duplicate);
        }
        self.records
            .insert(record.identifier.clone(), record.clone());
        Ok(InsertOutcome::Inserted)
    }
}

impl RecordStore for MemorySink {
    type File<'a> = MemoryFileSink<'a>;

    fn begin_file(&mut self) -> anyhow::Result<MemoryFileSink<'_>> {
        Ok(MemoryFileSink {
            target: self,
            staged: BTreeMap::new(),
        })
    }
}

/// Staged inserts for one file, merged into the parent [`MemorySink`] on commit
#[derive(Debug)]
pub struct MemoryFileSink<'a> {
    target: &'a mut MemorySink,
    staged: BTreeMap<String, CompleteRecord>,
}

impl RecordSink for MemoryFileSink<'_> {
    fn insert(&mut self, record: &CompleteRecord) -> anyhow::Result<InsertOutcome> {
        if self.target.records.contains_key(&record.identifier)
            || self.staged.contains_key(&record.identifier)
        {
            return Ok(InsertOutcome::Duplicate);
        }
        self.staged
            .insert(record.identifier.clone(), record.clone());
        Ok(InsertOutcome::Inserted)
    }
}

impl FileSink for MemoryFileSink<'_> {
    fn commit(self) -> anyhow::Result<()> {
        self.target.records.extend(self.staged);
        Ok(())
    }

    fn rollback(self) -> anyhow::Result<()> {
        Ok(())
    }
}

//! Pubharvest Core - shared pieces of the publication ETL
//!
//! The record model and sink contract used by the extractor and the store,
//! plus logging, progress and shutdown plumbing for the CLI.

pub mod logging;
pub mod progress;
pub mod record;
pub mod shutdown;
pub mod sink;

// Re-exports for convenience
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ByteCounter, ProgressContext, SharedProgress, fmt_num, pct};
pub use record::{CompleteRecord, Field, PublicationRecord};
pub use shutdown::{
    INTERRUPTED_EXIT, install_signal_handlers, is_shutdown_requested, request_shutdown,
};
pub use sink::{FileSink, InsertOutcome, MemoryFileSink, MemorySink, RecordSink, RecordStore};

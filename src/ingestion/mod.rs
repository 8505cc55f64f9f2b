//! Per-file ingestion: format dispatch and the CSV/JSON ingesters.
//!
//! Batch callers normally go through [`crate::batch::ingest_batch`]; this module is what it
//! dispatches to. Format-specific functions are available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
mod infer;
pub mod json;
pub mod observability;
pub mod unified;

pub use observability::{
    BatchStats, CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver,
};
pub use unified::{CsvIngester, Ingester, IngestionFormat, IngestionOptions, JsonIngester, ingest_from_path};

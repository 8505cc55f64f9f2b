//! `archive-ingestion` loads the CSV and JSON files of a zip archive (or of an
//! already-extracted folder) into in-memory [`types::Table`]s, grouped by format.
//!
//! The primary entrypoint is [`batch::ingest_batch`]:
//!
//! 1. the destination directory is created if missing;
//! 2. a `.zip` source is extracted into it ([`archive::extract_zip`]); a directory source is
//!    listed in place;
//! 3. every listed file is routed by extension to the CSV or JSON ingester;
//! 4. tables are collected into a [`batch::BatchResult`].
//!
//! Any failure (wrong source kind, empty archive, a file with an unknown extension, a file that
//! does not parse) aborts the batch with an [`IngestionError`]; there are no partial results.
//!
//! ## Tables
//!
//! Columns are named by the CSV header row or the JSON keys. Their types are inferred:
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//!
//! Empty CSV cells and JSON `null`/missing keys map to [`types::Value::Null`].
//!
//! ## Example
//!
//! ```no_run
//! use archive_ingestion::batch::ingest_batch;
//! use archive_ingestion::ingestion::IngestionFormat;
//!
//! # fn main() -> Result<(), archive_ingestion::IngestionError> {
//! let result = ingest_batch("price_data.zip", "extracted_price_data")?;
//! for table in &result.csv {
//!     println!("columns={:?} rows={}", table.column_names(), table.row_count());
//! }
//! // Prints "No JSON files found" when the archive had no JSON files.
//! println!("{}", result.summary(IngestionFormat::Json));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`batch`]: batch entrypoints and the grouped result
//! - [`archive`]: zip extraction
//! - [`ingestion`]: format dispatch, CSV/JSON ingesters and observer hooks
//! - [`types`]: table data model
//! - [`error`]: error type shared by every operation

pub mod archive;
pub mod batch;
pub mod error;
pub mod ingestion;
pub mod types;

pub use batch::{BatchResult, ingest_batch, ingest_batch_with_options};
pub use error::{IngestionError, IngestionResult};

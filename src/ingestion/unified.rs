//! Format dispatch and single-file ingestion.
//!
//! [`IngestionFormat`] is the closed set of formats this crate reads. Each variant carries its
//! parse capability ([`IngestionFormat::ingest`]), so callers select a format from a file
//! extension and never need a trait object. The [`Ingester`] trait exposes the same capability
//! for code that wants to hold an ingester value.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Table;

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestionFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON records or columns (array, object, or NDJSON).
    Json,
}

impl IngestionFormat {
    /// Every format, in the order batch results list them.
    pub const ALL: [IngestionFormat; 2] = [IngestionFormat::Csv, IngestionFormat::Json];

    /// Parse an ingestion format from a file extension.
    ///
    /// Matching is exact: `CSV` or `ndjson` select nothing.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Format selected by the extension of `path`, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Key used for this format in batch results (`"csv"` / `"json"`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Parse the file at `path` as this format.
    pub fn ingest(self, path: &Path) -> IngestionResult<Table> {
        match self {
            Self::Csv => csv::ingest_csv_from_path(path),
            Self::Json => json::ingest_json_from_path(path),
        }
    }

    /// The [`Ingester`] for this format.
    pub fn ingester(self) -> &'static dyn Ingester {
        match self {
            Self::Csv => &CsvIngester,
            Self::Json => &JsonIngester,
        }
    }
}

impl fmt::Display for IngestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
        })
    }
}

/// Parses one file of a known format into a [`Table`].
///
/// Implementations do not check that the file extension matches the content; a misnamed file
/// fails with whatever error the parser reports.
pub trait Ingester: Send + Sync {
    /// Format this ingester reads.
    fn format(&self) -> IngestionFormat;

    /// Parse the file at `path`.
    fn ingest(&self, path: &Path) -> IngestionResult<Table>;
}

/// Reads comma-separated files (see [`csv::ingest_csv_from_path`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvIngester;

impl Ingester for CsvIngester {
    fn format(&self) -> IngestionFormat {
        IngestionFormat::Csv
    }

    fn ingest(&self, path: &Path) -> IngestionResult<Table> {
        csv::ingest_csv_from_path(path)
    }
}

/// Reads JSON files (see [`json::ingest_json_from_path`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonIngester;

impl Ingester for JsonIngester {
    fn format(&self) -> IngestionFormat {
        IngestionFormat::Json
    }

    fn ingest(&self, path: &Path) -> IngestionResult<Table> {
        json::ingest_json_from_path(path)
    }
}

/// Options shared by single-file and batch ingestion.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl IngestionOptions {
    /// Forward a failure (and, past the threshold, an alert) to the observer.
    pub(crate) fn report_failure(&self, ctx: &IngestionContext, error: &IngestionError) {
        if let Some(obs) = self.observer.as_ref() {
            let sev = severity_for_error(error);
            obs.on_failure(ctx, sev, error);
            if sev >= self.alert_at_or_above {
                obs.on_alert(ctx, sev, error);
            }
        }
    }
}

/// Ingest a single CSV or JSON file, choosing the format from its extension.
///
/// Fails with [`IngestionError::UnsupportedFileKind`] when the extension has no ingester.
///
/// ```no_run
/// use archive_ingestion::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), archive_ingestion::IngestionError> {
/// let table = ingest_from_path("prices.csv", &IngestionOptions::default())?;
/// println!("columns={:?} rows={}", table.column_names(), table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<Table> {
    let path = path.as_ref();
    let format = IngestionFormat::from_path(path);
    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format,
    };

    let result = match format {
        Some(format) => format.ingest(path),
        None => Err(IngestionError::UnsupportedFileKind {
            path: path.to_path_buf(),
        }),
    };

    match &result {
        Ok(table) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(
                    &ctx,
                    IngestionStats {
                        rows: table.row_count(),
                        columns: table.column_count(),
                    },
                );
            }
        }
        Err(e) => options.report_failure(&ctx, e),
    }

    result
}

pub(crate) fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) | IngestionError::Zip(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Json(err) if err.is_io() => IngestionSeverity::Critical,
        _ => IngestionSeverity::Error,
    }
}

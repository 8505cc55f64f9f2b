//! Batch ingestion of a zip archive or an already-extracted folder.
//!
//! [`ingest_batch`] resolves the source into a file listing (extracting the archive if needed),
//! routes every listed file to the ingester matching its extension, and groups the resulting
//! tables by format. A single failing file aborts the whole batch.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::archive::{self, is_zip_path};
use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::{BatchStats, IngestionContext, IngestionFormat, IngestionOptions, IngestionStats};
use crate::types::Table;

/// Tables produced by one batch, grouped by source format.
///
/// Each list keeps the order the files were dispatched in (sorted by file name). An empty list
/// means no file of that format was found; [`BatchResult::summary`] turns that into the
/// `"No CSV files found"` / `"No JSON files found"` message at presentation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub csv: Vec<Table>,
    pub json: Vec<Table>,
}

impl BatchResult {
    /// Tables ingested for `format`.
    pub fn tables(&self, format: IngestionFormat) -> &[Table] {
        match format {
            IngestionFormat::Csv => &self.csv,
            IngestionFormat::Json => &self.json,
        }
    }

    fn push(&mut self, format: IngestionFormat, table: Table) {
        match format {
            IngestionFormat::Csv => self.csv.push(table),
            IngestionFormat::Json => self.json.push(table),
        }
    }

    /// `true` when neither format produced a table.
    pub fn is_empty(&self) -> bool {
        self.csv.is_empty() && self.json.is_empty()
    }

    pub fn stats(&self) -> BatchStats {
        BatchStats {
            csv_tables: self.csv.len(),
            json_tables: self.json.len(),
        }
    }

    /// Human-readable description of the tables found for `format`.
    pub fn summary(&self, format: IngestionFormat) -> String {
        match self.tables(format).len() {
            0 => format!("No {format} files found"),
            n => format!("{n} {format} table(s)"),
        }
    }

    /// Keyed presentation of the result: `"csv"` and `"json"` map to the list of tables, or to
    /// the "no files found" message when that list is empty.
    pub fn to_json_value(&self) -> IngestionResult<serde_json::Value> {
        let mut out = serde_json::Map::new();
        for format in IngestionFormat::ALL {
            let tables = self.tables(format);
            let value = if tables.is_empty() {
                json!(self.summary(format))
            } else {
                serde_json::to_value(tables)?
            };
            out.insert(format.label().to_string(), value);
        }
        Ok(serde_json::Value::Object(out))
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for format in IngestionFormat::ALL {
            writeln!(f, "{}: {}", format.label(), self.summary(format))?;
        }
        Ok(())
    }
}

/// Ingest every file of `source` with default options.
///
/// See [`ingest_batch_with_options`].
pub fn ingest_batch(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> IngestionResult<BatchResult> {
    ingest_batch_with_options(source, destination, &IngestionOptions::default())
}

/// Ingest every file of `source`, which is either a directory or a `.zip` archive.
///
/// 1. `destination` is created if it does not exist.
/// 2. A directory source is listed as-is and its files are read in place. A `.zip` source is
///    extracted into `destination` (see [`archive::extract_zip`]) and the files are read from
///    there.
/// 3. Each listed name is dispatched by extension: `.csv` to the CSV ingester, `.json` to the
///    JSON ingester. Any other entry, including sub-directories, fails with
///    [`IngestionError::UnsupportedFileKind`].
///
/// Any error aborts the batch and no tables are returned. Concurrent calls sharing a
/// `destination` are not coordinated.
///
/// ```no_run
/// use archive_ingestion::batch::ingest_batch;
/// use archive_ingestion::ingestion::IngestionFormat;
///
/// # fn main() -> Result<(), archive_ingestion::IngestionError> {
/// let result = ingest_batch("price_data.zip", "extracted_price_data")?;
/// for table in result.tables(IngestionFormat::Csv) {
///     println!("{:?}", table.column_names());
/// }
/// println!("{}", result.summary(IngestionFormat::Json));
/// # Ok(())
/// # }
/// ```
pub fn ingest_batch_with_options(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &IngestionOptions,
) -> IngestionResult<BatchResult> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    let listing = resolve_source(source, destination, options).inspect_err(|e| {
        let ctx = IngestionContext {
            path: source.to_path_buf(),
            format: None,
        };
        options.report_failure(&ctx, e);
    })?;

    let mut result = BatchResult::default();
    for name in &listing.files {
        let path = listing.dir.join(name);
        let (format, table) = ingest_listed_file(&path, options)?;
        result.push(format, table);
    }

    if let Some(obs) = options.observer.as_ref() {
        obs.on_batch_complete(source, result.stats());
    }
    Ok(result)
}

/// Files to dispatch and the directory they live in.
struct Listing {
    dir: PathBuf,
    files: Vec<String>,
}

fn resolve_source(source: &Path, destination: &Path, options: &IngestionOptions) -> IngestionResult<Listing> {
    fs::create_dir_all(destination)?;

    if source.is_dir() {
        Ok(Listing {
            dir: source.to_path_buf(),
            files: archive::list_dir_names(source)?,
        })
    } else if is_zip_path(source) {
        let files = archive::extract_zip(source, destination)?;
        if let Some(obs) = options.observer.as_ref() {
            obs.on_extracted(source, &files);
        }
        Ok(Listing {
            dir: destination.to_path_buf(),
            files,
        })
    } else {
        Err(IngestionError::UnsupportedSourceKind {
            path: source.to_path_buf(),
        })
    }
}

fn ingest_listed_file(path: &Path, options: &IngestionOptions) -> IngestionResult<(IngestionFormat, Table)> {
    // Directories have no ingester even when their name looks like `x.csv`.
    let format = if path.is_dir() {
        None
    } else {
        IngestionFormat::from_path(path)
    };
    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format,
    };

    let Some(format) = format else {
        let err = IngestionError::UnsupportedFileKind {
            path: path.to_path_buf(),
        };
        options.report_failure(&ctx, &err);
        return Err(err);
    };

    match format.ingest(path) {
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
            Ok((format, table))
        }
        Err(e) => {
            options.report_failure(&ctx, &e);
            Err(e)
        }
    }
}

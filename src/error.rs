use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by extraction, ingestion and batch functions.
///
/// Every error is fatal to the call that produced it: a batch never returns partial results.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error (malformed quoting, ragged rows, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The archive could not be opened or decompressed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A path was handed to an operation that expects a different kind of file.
    #[error("invalid input '{}': not a {} file", .path.display(), .expected)]
    InvalidInputKind { path: PathBuf, expected: &'static str },

    /// Extraction left the destination directory empty.
    #[error("no files present after extracting '{}'", .path.display())]
    EmptyArchive { path: PathBuf },

    /// The batch source is neither a directory nor a zip archive.
    #[error(
        "unsupported source '{}': only zip files or pre-extracted folders are supported",
        .path.display()
    )]
    UnsupportedSourceKind { path: PathBuf },

    /// A listed file has no matching ingester.
    #[error("no ingester found for file '{}'", .path.display())]
    UnsupportedFileKind { path: PathBuf },

    /// Content does not have a tabular shape.
    ///
    /// `location` is the file path, or `<input>` for in-memory sources.
    #[error("failed to parse {location}: {message}")]
    ParseError { location: String, message: String },
}

/// Location reported for content that did not come from a file.
pub(crate) const IN_MEMORY: &str = "<input>";

impl IngestionError {
    pub(crate) fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        IngestionError::ParseError {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Rewrites the location of an in-memory parse error to the file it was read from.
    pub(crate) fn located_at(self, path: &std::path::Path) -> Self {
        match self {
            IngestionError::ParseError { location, message } if location == IN_MEMORY => {
                IngestionError::ParseError {
                    location: path.display().to_string(),
                    message,
                }
            }
            other => other,
        }
    }

    /// Returns `true` when the error means "content does not match the expected format", as
    /// opposed to an infrastructure or dispatch failure.
    pub fn is_parse_error(&self) -> bool {
        match self {
            IngestionError::Csv(err) => !matches!(err.kind(), csv::ErrorKind::Io(_)),
            IngestionError::Json(err) => !err.is_io(),
            IngestionError::ParseError { .. } => true,
            _ => false,
        }
    }
}

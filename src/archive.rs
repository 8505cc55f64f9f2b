//! Zip archive extraction.

use std::fs::{self, File};
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};

/// Returns `true` if `path` ends in `.zip` (lowercase, as written).
pub fn is_zip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "zip")
}

/// Extract every entry of the zip archive at `archive_path` into `destination`.
///
/// Returns the names of the top-level entries of `destination` after extraction, sorted. The
/// listing is not limited to files written by this call: anything already present in
/// `destination` is listed too.
///
/// Errors:
///
/// - [`IngestionError::InvalidInputKind`] if `archive_path` does not end in `.zip`
/// - [`IngestionError::EmptyArchive`] if `destination` is empty after extraction
/// - [`IngestionError::Io`] / [`IngestionError::Zip`] if the archive cannot be read
///
/// Nothing is cleaned up on failure.
pub fn extract_zip(archive_path: impl AsRef<Path>, destination: impl AsRef<Path>) -> IngestionResult<Vec<String>> {
    let archive_path = archive_path.as_ref();
    let destination = destination.as_ref();

    if !is_zip_path(archive_path) {
        return Err(IngestionError::InvalidInputKind {
            path: archive_path.to_path_buf(),
            expected: "zip",
        });
    }

    let mut archive = zip::ZipArchive::new(File::open(archive_path)?)?;
    fs::create_dir_all(destination)?;
    // `extract` rejects entries whose names would escape `destination`.
    archive.extract(destination)?;

    let files = list_dir_names(destination)?;
    if files.is_empty() {
        return Err(IngestionError::EmptyArchive {
            path: archive_path.to_path_buf(),
        });
    }
    Ok(files)
}

/// Names of the direct entries of `dir`, sorted.
pub(crate) fn list_dir_names(dir: &Path) -> IngestionResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

//! Observer hooks for ingestion outcomes.
//!
//! Nothing is logged unless an [`IngestionObserver`] is attached through
//! [`super::IngestionOptions`]. [`StdErrObserver`] prints one line per event.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::IngestionError;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (I/O, corrupt archives and other infrastructure failures).
    Critical,
}

/// Context about a single file ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// Path of the file (or batch source) being ingested.
    pub path: PathBuf,
    /// Format chosen for the file; `None` when no ingester matched or the failure happened
    /// before dispatch (extraction, source checks).
    pub format: Option<IngestionFormat>,
}

/// Shape of a successfully ingested table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of ingested rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

/// Per-format table counts of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub csv_tables: usize,
    pub json_tables: usize,
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts. Every method has an empty default.
pub trait IngestionObserver: Send + Sync {
    /// Called after an archive was extracted, with the listing that will be dispatched.
    fn on_extracted(&self, _archive: &Path, _files: &[String]) {}

    /// Called when a file was ingested.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called once a whole batch succeeded.
    fn on_batch_complete(&self, _source: &Path, _stats: BatchStats) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_extracted(&self, archive: &Path, files: &[String]) {
        for o in &self.observers {
            o.on_extracted(archive, files);
        }
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_batch_complete(&self, source: &Path, stats: BatchStats) {
        for o in &self.observers {
            o.on_batch_complete(source, stats);
        }
    }
}

/// Logs ingestion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

fn format_label(format: Option<IngestionFormat>) -> &'static str {
    format.map_or("unknown", IngestionFormat::label)
}

impl IngestionObserver for StdErrObserver {
    fn on_extracted(&self, archive: &Path, files: &[String]) {
        eprintln!(
            "[ingest][extract] archive={} files={}",
            archive.display(),
            files.len()
        );
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!(
            "[ingest][ok] format={} path={} rows={} columns={}",
            format_label(ctx.format),
            ctx.path.display(),
            stats.rows,
            stats.columns
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[ingest][{:?}] format={} path={} err={}",
            severity,
            format_label(ctx.format),
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!(
            "[ALERT][ingest][{:?}] format={} path={} err={}",
            severity,
            format_label(ctx.format),
            ctx.path.display(),
            error
        );
    }

    fn on_batch_complete(&self, source: &Path, stats: BatchStats) {
        eprintln!(
            "[ingest][batch] source={} csv_tables={} json_tables={}",
            source.display(),
            stats.csv_tables,
            stats.json_tables
        );
    }
}

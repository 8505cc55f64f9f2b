use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use archive_ingestion::IngestionError;
use archive_ingestion::ingest_batch_with_options;
use archive_ingestion::ingestion::{
    BatchStats, CompositeObserver, IngestionContext, IngestionObserver, IngestionOptions, IngestionSeverity,
    IngestionStats, ingest_from_path,
};
use zip::write::SimpleFileOptions;

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl IngestionObserver for RecordingObserver {
    fn on_extracted(&self, _archive: &Path, files: &[String]) {
        self.events.lock().unwrap().push(format!("extracted {}", files.join(",")));
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        let name = ctx.path.file_name().unwrap().to_string_lossy().into_owned();
        self.events
            .lock()
            .unwrap()
            .push(format!("ok {name} rows={} columns={}", stats.rows, stats.columns));
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.alerts.lock().unwrap().push(severity);
    }

    fn on_batch_complete(&self, _source: &Path, stats: BatchStats) {
        self.events
            .lock()
            .unwrap()
            .push(format!("batch csv={} json={}", stats.csv_tables, stats.json_tables));
    }
}

fn options(obs: &Arc<RecordingObserver>, threshold: IngestionSeverity) -> IngestionOptions {
    IngestionOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: threshold,
    }
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn observer_sees_every_step_of_a_successful_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("price_data.zip");
    write_zip(
        &archive,
        &[("prices.csv", "date,price\n2021-01-01,10.5\n"), ("prices.json", r#"[{"a":1},{"a":2}]"#)],
    );
    let obs = Arc::new(RecordingObserver::default());

    ingest_batch_with_options(&archive, tmp.path().join("out"), &options(&obs, IngestionSeverity::Critical))
        .unwrap();

    assert_eq!(
        obs.events(),
        vec![
            "extracted prices.csv,prices.json".to_string(),
            "ok prices.csv rows=1 columns=2".to_string(),
            "ok prices.json rows=2 columns=1".to_string(),
            "batch csv=1 json=1".to_string(),
        ]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_without_alert_for_unsupported_file() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("notes.zip");
    write_zip(&archive, &[("a.csv", "x\n1\n"), ("b.txt", "hello")]);
    let obs = Arc::new(RecordingObserver::default());

    let _ = ingest_batch_with_options(&archive, tmp.path().join("out"), &options(&obs, IngestionSeverity::Critical))
        .unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
    // the earlier file was ingested but the batch never completed
    assert_eq!(
        obs.events(),
        vec!["extracted a.csv,b.txt".to_string(), "ok a.csv rows=1 columns=1".to_string()]
    );
}

#[test]
fn observer_receives_alert_on_critical_io_error() {
    let tmp = tempfile::tempdir().unwrap();
    let obs = Arc::new(RecordingObserver::default());

    // Missing archive -> Io error -> Critical
    let err = ingest_batch_with_options(
        tmp.path().join("missing.zip"),
        tmp.path().join("out"),
        &options(&obs, IngestionSeverity::Critical),
    )
    .unwrap_err();

    assert!(matches!(err, IngestionError::Io(_)));
    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Critical]);
}

#[test]
fn single_file_ingestion_reports_to_observer() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options(&obs, IngestionSeverity::Error);

    ingest_from_path("tests/fixtures/prices.csv", &opts).unwrap();
    let err = ingest_from_path("tests/fixtures/extracted", &opts).unwrap_err();

    assert!(matches!(err, IngestionError::UnsupportedFileKind { .. }));
    assert_eq!(obs.events(), vec!["ok prices.csv rows=2 columns=2".to_string()]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Error]);
}

#[test]
fn composite_observer_fans_out_to_every_observer() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("price_data.zip");
    write_zip(&archive, &[("a.csv", "date,price\n2021-01-01,10.5\n"), ("b.txt", "hello")]);
    let first = Arc::new(RecordingObserver::default());
    let second = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(Arc::new(CompositeObserver::new(vec![first.clone(), second.clone()]))),
        alert_at_or_above: IngestionSeverity::Error,
    };

    let _ = ingest_batch_with_options(&archive, tmp.path().join("out"), &opts).unwrap_err();

    for obs in [&first, &second] {
        assert_eq!(
            obs.events(),
            vec!["extracted a.csv,b.txt".to_string(), "ok a.csv rows=1 columns=2".to_string()]
        );
        assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Error]);
        assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Error]);
    }
}

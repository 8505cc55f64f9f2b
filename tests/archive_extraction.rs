use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use archive_ingestion::IngestionError;
use archive_ingestion::archive::{extract_zip, is_zip_path};
use zip::write::SimpleFileOptions;

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn extract_zip_lists_extracted_files() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("price_data.zip");
    write_zip(
        &archive,
        &[
            ("prices.json", r#"[{"date":"2021-01-01","price":10.5}]"#),
            ("prices.csv", "date,price\n2021-01-01,10.5\n"),
        ],
    );
    let dest = tmp.path().join("out");

    let files = extract_zip(&archive, &dest).unwrap();

    assert_eq!(files, vec!["prices.csv".to_string(), "prices.json".to_string()]);
    assert_eq!(
        fs::read_to_string(dest.join("prices.csv")).unwrap(),
        "date,price\n2021-01-01,10.5\n"
    );
}

#[test]
fn extract_zip_lists_files_already_in_destination() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("data.zip");
    write_zip(&archive, &[("new.csv", "a\n1\n")]);
    let dest = tmp.path().join("out");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("old.csv"), "a\n2\n").unwrap();

    let files = extract_zip(&archive, &dest).unwrap();
    assert_eq!(files, vec!["new.csv".to_string(), "old.csv".to_string()]);
}

#[test]
fn extract_zip_rejects_non_zip_path() {
    let tmp = tempfile::tempdir().unwrap();
    let err = extract_zip("tests/fixtures/prices.csv", tmp.path()).unwrap_err();
    assert!(matches!(err, IngestionError::InvalidInputKind { expected: "zip", .. }));
    assert!(err.to_string().contains("not a zip file"));
}

#[test]
fn extract_zip_rejects_uppercase_suffix() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("DATA.ZIP");
    write_zip(&archive, &[("prices.csv", "a\n1\n")]);

    let err = extract_zip(&archive, tmp.path().join("out")).unwrap_err();
    assert!(matches!(err, IngestionError::InvalidInputKind { .. }));
}

#[test]
fn extract_zip_errors_on_empty_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("empty.zip");
    write_zip(&archive, &[]);

    let err = extract_zip(&archive, tmp.path().join("out")).unwrap_err();
    assert!(matches!(err, IngestionError::EmptyArchive { .. }));
}

#[test]
fn extract_zip_errors_on_corrupt_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("corrupt.zip");
    fs::write(&archive, b"definitely not a zip").unwrap();

    let err = extract_zip(&archive, tmp.path().join("out")).unwrap_err();
    assert!(matches!(err, IngestionError::Zip(_)));
}

#[test]
fn zip_suffix_check_is_exact() {
    assert!(is_zip_path(Path::new("dir/data.zip")));
    assert!(!is_zip_path(Path::new("DATA.ZIP")));
    assert!(!is_zip_path(Path::new("data.Zip")));
    assert!(!is_zip_path(Path::new("data.zip.csv")));
    assert!(!is_zip_path(Path::new("zip")));
}

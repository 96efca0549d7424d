use std::fs;

use scanner_engine::{archive_file_name, ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_archive() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("reports.zip", b"first").unwrap();
    assert_eq!(first.file_name().unwrap(), "reports.zip");
    assert_eq!(fs::read(&first).unwrap(), b"first");

    let second = writer.write("reports.zip", b"second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
}

#[test]
fn write_fails_when_output_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("reports.zip", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("reports.zip").exists());
}

#[test]
fn archive_name_comes_from_last_segment() {
    assert_eq!(
        archive_file_name("/download/pdf_reports_20240101_000000.zip").as_deref(),
        Some("pdf_reports_20240101_000000.zip")
    );
    assert_eq!(
        archive_file_name("https://cdn.example/a/b/x.zip?token=1#frag").as_deref(),
        Some("x.zip")
    );
    assert_eq!(
        archive_file_name("/download/we:ird*name.zip").as_deref(),
        Some("we_ird_name.zip")
    );
}

#[test]
fn archive_name_is_none_without_segment() {
    assert_eq!(archive_file_name("/download/"), None);
    assert_eq!(archive_file_name(""), None);
    assert_eq!(archive_file_name("/download/.."), None);
}

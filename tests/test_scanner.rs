use log_triage::classifier::RuleTable;
use log_triage::error::TriageError;
use log_triage::export::{
    ExportFormat, ExportOptions, ExportSource, read_csv_export, read_json_export, write_export,
};
use log_triage::filter::{KeywordFilter, SeverityFilter};
use log_triage::scanner::{LogRecord, MatchSet, scan_file};
use log_triage::severity::Severity;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SAMPLE: &str = concat!(
    "2024-01-01 Login success\n",
    "2024-01-01 Failed attempt\n",
    "2024-01-01 root access granted\n",
);

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

fn scan(path: &Path, keywords: &[&str], severities: &SeverityFilter) -> MatchSet {
    let rules = RuleTable::default();
    let keywords = KeywordFilter::new(keywords).expect("valid keywords");
    scan_file(path, &rules, &keywords, severities).expect("scan should succeed")
}

#[test]
fn test_login_scenario_matches_failed_and_root_lines() {
    let dir = tempdir().expect("temp dir");
    let file = dir.path().join("sample.log");
    write_file(&file, SAMPLE);

    let matches = scan(&file, &["failed", "root"], &SeverityFilter::All);

    assert_eq!(
        matches.records(),
        [
            LogRecord::new(Severity::Warning, "2024-01-01 Failed attempt"),
            LogRecord::new(Severity::Critical, "2024-01-01 root access granted"),
        ]
    );
}

#[test]
fn test_keyword_case_does_not_change_results() {
    let dir = tempdir().expect("temp dir");
    let upper = dir.path().join("upper.log");
    let lower = dir.path().join("lower.log");
    write_file(&upper, "ERROR occurred\n");
    write_file(&lower, "error occurred\n");

    let a = scan(&upper, &["Error"], &SeverityFilter::All);
    let b = scan(&lower, &["ERROR"], &SeverityFilter::All);

    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(a.records()[0].severity, b.records()[0].severity);
}

#[test]
fn test_n_matching_lines_yield_n_records_in_file_order() {
    let dir = tempdir().expect("temp dir");
    let file = dir.path().join("many.log");
    let mut content = String::new();
    for i in 0..50 {
        if i % 5 == 0 {
            content.push_str(&format!("line {i} connection refused\n"));
        } else {
            content.push_str(&format!("line {i} ok\n"));
        }
    }
    write_file(&file, &content);

    let matches = scan(&file, &["refused"], &SeverityFilter::All);

    assert_eq!(matches.len(), 10);
    for (n, record) in matches.iter().enumerate() {
        assert_eq!(record.severity, Severity::Error);
        assert_eq!(record.text, format!("line {} connection refused", n * 5));
    }
}

#[test]
fn test_missing_file_reports_source_not_found() {
    let dir = tempdir().expect("temp dir");
    let rules = RuleTable::default();
    let keywords = KeywordFilter::new(["failed"]).unwrap();

    let result = scan_file(
        dir.path().join("nope.log"),
        &rules,
        &keywords,
        &SeverityFilter::All,
    );

    match result {
        Err(TriageError::SourceNotFound { path }) => assert!(path.ends_with("nope.log")),
        other => panic!("expected SourceNotFound, got {other:?}"),
    }
}

#[test]
fn test_no_matches_writes_no_export() {
    let dir = tempdir().expect("temp dir");
    let file = dir.path().join("quiet.log");
    let out = dir.path().join("output");
    write_file(&file, SAMPLE);

    let matches = scan(&file, &["panic"], &SeverityFilter::All);
    assert!(matches.is_empty());

    let keywords = vec!["panic".to_string()];
    let written = write_export(
        &matches,
        ExportSource {
            path: &file,
            keywords: &keywords,
        },
        &ExportOptions::new(ExportFormat::Csv, &out),
    )
    .expect("export should not fail");

    assert!(written.is_none());
    assert!(!out.exists());
}

#[test]
fn test_structured_exports_read_back_the_same_records() {
    let dir = tempdir().expect("temp dir");
    let file = dir.path().join("sample.log");
    write_file(
        &file,
        "disk error, \"sda\" offline\n[auth] access denied\nroot shell spawned\n",
    );
    let matches = scan(&file, &["error", "denied", "root"], &SeverityFilter::All);
    assert_eq!(matches.len(), 3);

    let keywords = vec!["error".to_string(), "denied".to_string(), "root".to_string()];
    let source = ExportSource {
        path: &file,
        keywords: &keywords,
    };

    let json_path = write_export(
        &matches,
        source,
        &ExportOptions::new(ExportFormat::Json, dir.path().join("json")),
    )
    .unwrap()
    .expect("json export written");
    let from_json =
        read_json_export(fs::File::open(&json_path).unwrap(), Severity::Info).unwrap();
    assert_eq!(from_json, matches.records());

    let csv_path = write_export(
        &matches,
        source,
        &ExportOptions::new(ExportFormat::Csv, dir.path().join("csv")),
    )
    .unwrap()
    .expect("csv export written");
    let from_csv = read_csv_export(fs::File::open(&csv_path).unwrap(), Severity::Info).unwrap();
    assert_eq!(from_csv, matches.records());
}

#[test]
fn test_text_export_has_header_and_tagged_lines() {
    let dir = tempdir().expect("temp dir");
    let file = dir.path().join("sample.log");
    write_file(&file, SAMPLE);
    let matches = scan(&file, &["failed", "root"], &SeverityFilter::All);

    let keywords = vec!["failed".to_string(), "root".to_string()];
    let path = write_export(
        &matches,
        ExportSource {
            path: &file,
            keywords: &keywords,
        },
        &ExportOptions::new(ExportFormat::Text, dir.path().join("out")),
    )
    .unwrap()
    .expect("text export written");

    assert_eq!(path.extension().unwrap(), "txt");
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("Keywords: failed, root"));
    assert!(text.contains("[WARNING] 2024-01-01 Failed attempt\n"));
    assert!(text.ends_with("[CRITICAL] 2024-01-01 root access granted\n"));
}

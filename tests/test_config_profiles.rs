use log_triage::config::{
    ConfigError, TriageConfig, default_config, load_config, load_config_from_path,
};
use log_triage::filter::{KeywordFilter, SeverityFilter};
use log_triage::scanner::scan_file;
use log_triage::severity::Severity;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_no_config_path_uses_builtin_defaults() {
    let config = load_config(None).expect("defaults always load");
    assert_eq!(&config, default_config());
    let rules = config.rule_table().unwrap();
    assert_eq!(rules.rules()[0].severity, Severity::Info);
    assert_eq!(rules.default_severity(), Severity::Info);
}

#[test]
fn test_custom_rule_table_changes_classification_and_priority() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("triage.toml");
    fs::write(
        &config_path,
        r#"
default_severity = "WARNING"

[[rules]]
severity = "CRITICAL"
triggers = ["OutOfMemory"]

[[rules]]
severity = "error"
triggers = ["memory", "fault"]

[monitor]
poll_interval_ms = 200
"#,
    )
    .unwrap();

    let config = load_config_from_path(&config_path).expect("config should load");
    let rules = config.rule_table().unwrap();

    assert_eq!(
        rules.classify("java.lang.OutOfMemory in heap memory"),
        Severity::Critical
    );
    assert_eq!(rules.classify("page fault"), Severity::Error);
    assert_eq!(rules.classify("slow response"), Severity::Warning);
    assert_eq!(
        config.monitor_options().unwrap().poll_interval,
        Duration::from_millis(200)
    );

    let log = dir.path().join("app.log");
    fs::write(&log, "page fault at 0x0\nslow response\nOutOfMemory\n").unwrap();
    let keywords = KeywordFilter::new(["fault", "slow", "memory"]).unwrap();
    let matches = scan_file(
        &log,
        &rules,
        &keywords,
        &SeverityFilter::only([Severity::Error, Severity::Critical]),
    )
    .unwrap();
    let severities: Vec<Severity> = matches.iter().map(|r| r.severity).collect();
    assert_eq!(severities, [Severity::Error, Severity::Critical]);
}

#[test]
fn test_duplicate_severity_in_config_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("bad.toml");
    fs::write(
        &config_path,
        r#"
[[rules]]
severity = "ERROR"
triggers = ["a"]

[[rules]]
severity = "ERROR"
triggers = ["b"]
"#,
    )
    .unwrap();

    let err = load_config_from_path(&config_path).expect_err("duplicate severity");
    assert!(matches!(err, ConfigError::Rules(_)));
}

#[test]
fn test_unparseable_and_missing_config_files() {
    let dir = tempdir().expect("temp dir");
    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "rules = 12").unwrap();

    assert!(matches!(
        load_config_from_path(&broken),
        Err(ConfigError::Parse { .. })
    ));
    assert!(matches!(
        load_config(Some(Path::new("/definitely/not/here.toml"))),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn test_export_settings_flow_into_export_options() {
    let mut config = TriageConfig::default();
    config.export.output_dir = "reports".into();
    config.export.file_prefix = "nightly".to_string();

    let options = config.export_options(log_triage::ExportFormat::Json);
    assert_eq!(options.output_dir, Path::new("reports"));
    assert_eq!(options.file_prefix, "nightly");
    assert!(options.tagged);
}

#[test]
fn test_unknown_timestamp_specifier_is_rejected_at_load_time() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("stamp.toml");
    fs::write(
        &config_path,
        r#"
[export]
timestamp_format = "%Y-%Q"
"#,
    )
    .unwrap();

    let err = load_config_from_path(&config_path).expect_err("bad timestamp format");
    assert!(matches!(err, ConfigError::InvalidTimestampFormat(ref f) if f == "%Y-%Q"));
    assert!(err.to_string().contains("%Y-%Q"));
}

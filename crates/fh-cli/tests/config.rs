//! Configuration file parsing and command line overrides.

use std::path::PathBuf;

use fh_cli::config::{ConfigOverrides, FlightHubConfig, SourceKind};
use fh_output::ExportFormat;

#[test]
fn test_full_config_parses() {
    let config = FlightHubConfig::from_toml_str(
        r#"
        [source]
        kind = "csv"
        path = "data/tables"

        [load]
        chunk_size = 250

        [clean]
        duplicate_exempt = ["passenger_feedback", "booking"]

        [simulation]
        seed = 7

        [export]
        dir = "out"
        format = "txt"
        "#,
    )
    .unwrap();

    assert_eq!(config.source.kind, SourceKind::Csv);
    assert_eq!(config.source.path, PathBuf::from("data/tables"));
    assert_eq!(config.load.chunk_size, 250);
    assert_eq!(config.clean.duplicate_exempt.len(), 2);
    assert_eq!(config.simulation.seed, Some(7));
    assert_eq!(config.export.dir, PathBuf::from("out"));
    assert_eq!(config.export.format, ExportFormat::Txt);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = FlightHubConfig::from_toml_str("[simulation]\nseed = 1\n").unwrap();
    let defaults = FlightHubConfig::default();

    assert_eq!(config.source, defaults.source);
    assert_eq!(config.load.chunk_size, 1000);
    assert_eq!(config.clean.duplicate_exempt, vec!["passenger_feedback"]);
    assert_eq!(config.export.format, ExportFormat::Csv);
}

#[test]
fn test_explicit_file_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(FlightHubConfig::load(Some(&missing)).is_err());
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flighthub.toml");
    std::fs::write(&path, "[source]\nkind = \"mysql\"\n").unwrap();

    let err = FlightHubConfig::load(Some(&path)).unwrap_err();
    assert!(format!("{err:#}").contains("invalid config"));
}

#[test]
fn test_explicit_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[load]\nchunk_size = 5\n").unwrap();

    let config = FlightHubConfig::load(Some(&path)).unwrap();
    assert_eq!(config.load.chunk_size, 5);
}

#[test]
fn test_flags_override_file() {
    let config = FlightHubConfig::from_toml_str(
        "[source]\nkind = \"sqlite\"\npath = \"a.db\"\n[simulation]\nseed = 1\n",
    )
    .unwrap();
    let overrides = ConfigOverrides {
        csv_dir: Some(PathBuf::from("csv")),
        seed: Some(42),
        chunk_size: Some(0),
        format: Some(ExportFormat::Txt),
        ..Default::default()
    };

    let config = config.with_overrides(&overrides);
    assert_eq!(config.source.kind, SourceKind::Csv);
    assert_eq!(config.source.path, PathBuf::from("csv"));
    assert_eq!(config.simulation.seed, Some(42));
    // clamped to one row
    assert_eq!(config.load.chunk_size, 1);
    assert_eq!(config.export.format, ExportFormat::Txt);
}

#[test]
fn test_empty_overrides_change_nothing() {
    let config = FlightHubConfig::default();
    assert_eq!(
        config.clone().with_overrides(&ConfigOverrides::default()),
        config
    );
}

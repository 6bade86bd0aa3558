//! Unit tests for analysis configuration persistence.

use std::io::Write;
use strideline::config::{
    load_config, save_config, AnalysisConfig, ConfigError, Units, ZoneWeighting,
};
use strideline::{ActivityAnalyzer, AnalyticsError};
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("analysis.toml");

    let mut config = AnalysisConfig::cycling();
    config.swim.default_pool_length_m = 50.0;
    config.zones.weighting = ZoneWeighting::Elapsed;

    save_config(&path, &config).unwrap();
    let loaded = load_config(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_load_partial_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[smoothing]\nelevation_alpha = 0.35\n\n[join]\nsensor_tolerance_s = 5.0"
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.smoothing.elevation_alpha, 0.35);
    assert_eq!(config.join.sensor_tolerance_s, 5.0);
    assert_eq!(config.windows.vam_window_s, 30.0);
    assert_eq!(config.swim.min_main_repeats, 3);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = load_config(&dir.path().join("missing.toml"));
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[smoothing\nelevation_alpha = ").unwrap();
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_analyzer_rejects_bad_config() {
    let mut config = AnalysisConfig::default();
    config.speed_bounds.max_kmh = 1.0;
    assert!(matches!(
        ActivityAnalyzer::new(config),
        Err(AnalyticsError::InvalidInput(_))
    ));
}

#[test]
fn test_units_display() {
    assert_eq!(Units::Metric.to_string(), "Metric");
    assert_eq!(Units::Imperial.to_string(), "Imperial");
}

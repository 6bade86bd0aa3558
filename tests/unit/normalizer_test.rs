//! Unit tests for series normalization.

use serde_json::json;
use strideline::series::{normalize_timestamp, RawPoint, RawRecord, SensorSample, SeriesNormalizer};

fn records(values: Vec<serde_json::Value>) -> Vec<RawRecord> {
    values
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

fn record(value: serde_json::Value) -> RawRecord {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_timestamp_units() {
    assert_eq!(normalize_timestamp(1_700_000_000.0), 1_700_000_000.0);
    assert_eq!(normalize_timestamp(1_700_000_000_500.0), 1_700_000_000.5);
}

#[test]
fn test_mixed_naming_conventions() {
    let strava = RawPoint::from_record(&record(json!({
        "time": 1_700_000_000,
        "lat": 46.5,
        "lng": 6.6,
        "altitude": 372.0,
        "distance": 12.5,
        "velocity_smooth": 3.1,
        "heartrate": 140,
    })));
    assert_eq!(strava.timestamp_s, Some(1_700_000_000.0));
    assert_eq!(strava.latitude, Some(46.5));
    assert_eq!(strava.longitude, Some(6.6));
    assert_eq!(strava.elevation_m, Some(372.0));
    assert_eq!(strava.distance_m, Some(12.5));
    assert_eq!(strava.speed_mps, Some(3.1));
    assert_eq!(strava.hr_bpm, Some(140.0));

    let gpx = RawPoint::from_record(&record(json!({
        "time": "2024-03-01T08:00:05Z",
        "latitude": 46.5,
        "longitude": 6.6,
        "ele": 1200.0,
        "elevation_unit": "ft",
    })));
    assert_eq!(gpx.timestamp_s, Some(1_709_280_005.0));
    assert!((gpx.elevation_m.unwrap() - 365.76).abs() < 1e-9);
}

#[test]
fn test_distance_in_other_units() {
    let km = RawPoint::from_record(&record(json!({"t": 0, "distance_km": 1.5})));
    assert_eq!(km.distance_m, Some(1500.0));

    let mi = RawPoint::from_record(&record(json!({"t": 0, "distance_mi": 1.0})));
    assert_eq!(mi.distance_m, Some(1609.344));
}

#[test]
fn test_implausible_values_become_null() {
    let point = RawPoint::from_record(&record(json!({
        "t": 0,
        "lat": 95.0,
        "lon": 7.0,
        "hr": 400,
        "power": -20,
        "elevation_m": 12000.0,
    })));
    assert_eq!(point.latitude, None);
    assert_eq!(point.longitude, Some(7.0));
    assert_eq!(point.hr_bpm, None);
    assert_eq!(point.power_w, None);
    assert_eq!(point.elevation_m, None);
}

#[test]
fn test_numeric_strings_accepted() {
    let sample = SensorSample::from_record(&record(json!({"ts": "12.0", "bpm": "151"})));
    assert_eq!(sample.timestamp_s, Some(12.0));
    assert_eq!(sample.hr_bpm, Some(151.0));
}

#[test]
fn test_nearest_sample_per_field() {
    let points = records(vec![json!({"t": 50.0, "lat": 45.0, "lon": 7.0})]);
    let samples = records(vec![
        // Closest overall but carries no cadence
        json!({"t": 50.5, "hr": 120}),
        json!({"t": 44.0, "cadence": 88}),
        json!({"t": 58.0, "cadence": 92}),
    ]);

    let series = SeriesNormalizer::new(15.0).normalize(&points, &samples);

    assert_eq!(series.hr_bpm, vec![Some(120.0)]);
    assert_eq!(series.cadence, vec![Some(88.0)]);
}

#[test]
fn test_join_tolerance_respected() {
    let points = records(vec![json!({"t": 0.0, "lat": 45.0, "lon": 7.0})]);
    let samples = records(vec![json!({"t": 20.0, "hr": 120})]);

    let strict = SeriesNormalizer::new(15.0).normalize(&points, &samples);
    assert_eq!(strict.hr_bpm, vec![None]);

    let loose = SeriesNormalizer::new(30.0).normalize(&points, &samples);
    assert_eq!(loose.hr_bpm, vec![Some(120.0)]);
}

#[test]
fn test_series_columns_aligned() {
    let points = records(
        (0..50)
            .map(|i| json!({"t": 1_000 + i, "lat": 45.0 + f64::from(i) * 1e-4, "lon": 7.0}))
            .collect(),
    );
    let series = SeriesNormalizer::default().normalize(&points, &[]);

    assert_eq!(series.len(), 50);
    assert!(series.validate().is_ok());
    assert_eq!(series.time_s[0], 0.0);
    assert_eq!(series.time_s[49], 49.0);
}

//! Unit tests for zone definitions and classification.

use strideline::config::ZoneWeighting;
use strideline::metrics::{
    bins_from_durations, classify_series, power_zones_from_ftp, BandPreset, HeartRateProfile,
    MaxHrFormula, Sex, ZoneBand, ZoneDefinition, ZoneSource,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn upper_edges(zones: &ZoneDefinition) -> Vec<f64> {
    zones.bands().iter().filter_map(|b| b.upper_bound).collect()
}

// ========== Power Zone Tests ==========

#[test]
fn test_power_zones_from_ftp_200() {
    let zones = power_zones_from_ftp(200.0).unwrap();

    assert_eq!(zones.len(), 7);
    let edges = upper_edges(&zones);
    // Z1 0-55%, Z2 -75%, Z3 -90%, Z4 -105%, Z5 -120%, Z6 -150%, Z7 open
    for (edge, expected) in edges.iter().zip([110.0, 150.0, 180.0, 210.0, 240.0, 300.0]) {
        assert_close(*edge, expected);
    }
    assert_eq!(zones.bands()[0].lower_bound, 0.0);
    assert!(zones.bands()[6].upper_bound.is_none());
}

#[test]
fn test_power_zone_lookup() {
    let zones = power_zones_from_ftp(200.0).unwrap();

    assert_eq!(zones.zone_index(0.0), Some(0));
    assert_eq!(zones.zone_index(50.0), Some(0));
    assert_eq!(zones.zone_index(111.0), Some(1));
    assert_eq!(zones.zone_index(151.0), Some(2));
    assert_eq!(zones.zone_index(200.0), Some(3)); // At FTP
    assert_eq!(zones.zone_index(211.0), Some(4));
    assert_eq!(zones.zone_index(241.0), Some(5));
    assert_eq!(zones.zone_index(301.0), Some(6));
    assert_eq!(zones.zone_index(1000.0), Some(6));
}

#[test]
fn test_power_zone_names() {
    let zones = power_zones_from_ftp(200.0).unwrap();
    let names: Vec<&str> = zones.bands().iter().map(|b| b.name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "Active Recovery",
            "Endurance",
            "Tempo",
            "Threshold",
            "VO2max",
            "Anaerobic",
            "Neuromuscular"
        ]
    );
}

#[test]
fn test_invalid_ftp_rejected() {
    assert!(power_zones_from_ftp(0.0).is_err());
    assert!(power_zones_from_ftp(-150.0).is_err());
    assert!(power_zones_from_ftp(f64::NAN).is_err());
}

// ========== Heart Rate Zone Tests ==========

#[test]
fn test_hr_zones_from_karvonen() {
    // Max HR 180, Resting HR 60 => HRR = 120
    let profile = HeartRateProfile {
        max_hr: Some(180.0),
        resting_hr: Some(60.0),
        reserve: true,
        ..HeartRateProfile::from_age(40)
    };
    let zones = profile.zones().unwrap();

    // Edges at 60/70/80/90% of reserve: 132, 144, 156, 168 bpm
    let edges = upper_edges(&zones);
    for (edge, expected) in edges.iter().zip([132.0, 144.0, 156.0, 168.0]) {
        assert_close(*edge, expected);
    }
    assert_eq!(zones.ceiling(), Some(180.0));
}

#[test]
fn test_hr_zone_lookup() {
    let profile = HeartRateProfile {
        max_hr: Some(180.0),
        resting_hr: Some(60.0),
        reserve: true,
        ..HeartRateProfile::from_age(40)
    };
    let zones = profile.zones().unwrap();

    assert_eq!(zones.zone_index(100.0), Some(0));
    assert_eq!(zones.zone_index(140.0), Some(1));
    assert_eq!(zones.zone_index(150.0), Some(2));
    assert_eq!(zones.zone_index(160.0), Some(3));
    assert_eq!(zones.zone_index(175.0), Some(4));
    assert_eq!(zones.zone_index(200.0), Some(4));
}

#[test]
fn test_hr_zones_percent_of_estimated_max() {
    // Tanaka at 40: 208 - 28 = 180
    let zones = HeartRateProfile::from_age(40).zones().unwrap();

    let edges = upper_edges(&zones);
    for (edge, expected) in edges.iter().zip([108.0, 126.0, 144.0, 162.0]) {
        assert_close(*edge, expected);
    }
    assert_eq!(zones.bands()[4].name, "Maximum");
}

#[test]
fn test_running_preset() {
    let profile = HeartRateProfile {
        preset: BandPreset::Running,
        formula: MaxHrFormula::Fox,
        ..HeartRateProfile::from_age(40)
    };
    let zones = profile.zones().unwrap();

    // 220 - 40 = 180; edges at 70/80/87/93%
    let edges = upper_edges(&zones);
    for (edge, expected) in edges.iter().zip([126.0, 144.0, 156.6, 167.4]) {
        assert_close(*edge, expected);
    }
    assert_eq!(zones.bands()[0].name, "Easy");
}

#[test]
fn test_female_gulati_estimate() {
    let profile = HeartRateProfile {
        sex: Some(Sex::Female),
        formula: MaxHrFormula::Gulati,
        ..HeartRateProfile::from_age(50)
    };
    assert_close(profile.max_hr().unwrap(), 162.0);
}

#[test]
fn test_resting_above_max_rejected() {
    let profile = HeartRateProfile {
        max_hr: Some(150.0),
        resting_hr: Some(160.0),
        reserve: true,
        ..HeartRateProfile::from_age(40)
    };
    assert!(profile.zones().is_err());
}

#[test]
fn test_age_out_of_range_rejected() {
    assert!(HeartRateProfile::from_age(0).zones().is_err());
    assert!(HeartRateProfile::from_age(121).zones().is_err());
}

// ========== Explicit Definitions ==========

#[test]
fn test_explicit_bands_must_cover_without_gaps() {
    let band = |name: &str, lower: f64, upper: Option<f64>| ZoneBand {
        name: name.to_string(),
        lower_bound: lower,
        upper_bound: upper,
    };

    let contiguous = vec![band("Z1", 0.0, Some(100.0)), band("Z2", 100.0, None)];
    assert!(ZoneDefinition::new(contiguous).is_ok());
    let gapped = vec![band("Z1", 0.0, Some(100.0)), band("Z2", 110.0, None)];
    assert!(ZoneDefinition::new(gapped).is_err());
    let overlapping = vec![band("Z1", 0.0, Some(100.0)), band("Z2", 90.0, None)];
    assert!(ZoneDefinition::new(overlapping).is_err());
    assert!(ZoneDefinition::new(vec![band("Z1", 10.0, None)]).is_err());
    assert!(ZoneDefinition::new(vec![]).is_err());
}

#[test]
fn test_zone_source_from_json() {
    let ftp: ZoneSource = serde_json::from_str(r#"{"kind": "ftp", "ftp": 250}"#).unwrap();
    assert_eq!(ftp.definition().unwrap().len(), 7);

    let hr: ZoneSource =
        serde_json::from_str(r#"{"kind": "heart_rate", "age": 30, "preset": "running"}"#).unwrap();
    assert_eq!(hr.definition().unwrap().len(), 5);

    let explicit: ZoneSource = serde_json::from_str(
        r#"{"kind": "explicit", "bands": [
            {"name": "Easy", "lower_bound": 0, "upper_bound": 150},
            {"name": "Hard", "lower_bound": 150, "upper_bound": null}
        ]}"#,
    )
    .unwrap();
    assert_eq!(explicit.definition().unwrap().zone_index(150.0), Some(1));
}

// ========== Classification ==========

#[test]
fn test_classification_conserves_duration() {
    let zones = HeartRateProfile::from_age(40).zones().unwrap();
    let values: Vec<Option<f64>> = (0..600)
        .map(|i| if i % 7 == 0 { None } else { Some(100.0 + (i % 90) as f64) })
        .collect();
    let time: Vec<f64> = (0..600).map(f64::from).collect();

    let bins = classify_series(&zones, &values, &time, ZoneWeighting::PerSample).unwrap();

    let classified = values.iter().flatten().count() as f64;
    let total: f64 = bins.iter().map(|b| b.duration_s).sum();
    assert_eq!(total, classified);
    let percent: f64 = bins.iter().map(|b| b.percent).sum();
    assert!((percent - 100.0).abs() < 1e-9);
}

#[test]
fn test_precomputed_durations() {
    let zones = power_zones_from_ftp(250.0).unwrap();
    let bins = bins_from_durations(&zones, &[600.0, 1200.0, 300.0, 0.0, 0.0, 0.0, 0.0]).unwrap();

    assert_eq!(bins.len(), 7);
    assert_close(bins[1].percent, 1200.0 / 2100.0 * 100.0);
    assert_eq!(bins[6].range_max, None);
}

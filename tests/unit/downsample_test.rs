//! Unit tests for point-budget downsampling.

use strideline::series::downsample::downsample_indices;
use strideline::series::{downsample, CanonicalSeries};

fn ramp(len: usize) -> CanonicalSeries {
    CanonicalSeries::from_columns(
        (0..len).map(|i| i as f64 * 2.0).collect(),
        (0..len).map(|i| i as f64 * 5.0).collect(),
        (0..len).map(|i| Some(100.0 + i as f64)).collect(),
        (0..len).map(|i| Some(120.0 + (i % 40) as f64)).collect(),
        vec![None; len],
        vec![None; len],
    )
    .unwrap()
}

#[test]
fn test_budget_respected() {
    for budget in [2, 3, 10, 99, 250] {
        let indices = downsample_indices(1_000, budget);
        assert_eq!(indices.len(), budget);
        assert_eq!(indices.first(), Some(&0));
        assert_eq!(indices.last(), Some(&999));
    }
}

#[test]
fn test_values_are_original_samples() {
    let series = ramp(3_600);
    let reduced = downsample(&series, 120);

    assert_eq!(reduced.len(), 120);
    assert!(reduced.validate().is_ok());
    for (i, t) in reduced.time_s.iter().enumerate() {
        let source = (*t / 2.0) as usize;
        assert_eq!(reduced.distance_m[i], series.distance_m[source]);
        assert_eq!(reduced.hr_bpm[i], series.hr_bpm[source]);
    }
}

#[test]
fn test_short_series_untouched() {
    let series = ramp(20);
    assert_eq!(downsample(&series, 100), series);
}

#[test]
fn test_downsampling_is_deterministic() {
    let series = ramp(5_000);
    assert_eq!(downsample(&series, 333), downsample(&series, 333));
}

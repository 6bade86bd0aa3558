//! Integration tests for pool swim analysis through the activity pipeline.

use super::telemetry_mock::{init_tracing, structured_swim_lengths};
use strideline::analyzer::AnalysisRequest;
use strideline::swim::{PoolLengthHints, PoolLengthSource, PoolUnit, SetLabel};
use strideline::{analyze, SwimLength, TelemetryBundle, Units};

fn swim_bundle() -> TelemetryBundle {
    TelemetryBundle {
        lengths: Some(structured_swim_lengths()),
        ..Default::default()
    }
}

#[test]
fn test_structured_pool_session() {
    init_tracing();
    let analysis = analyze(&swim_bundle(), &AnalysisRequest::default()).unwrap();
    let swim = analysis.swim.unwrap();

    assert!(analysis.series.series.is_empty());
    assert_eq!(swim.pool_length_meters, 25.0);
    assert_eq!(swim.pool_length_source, PoolLengthSource::Inferred);
    assert_eq!(swim.pool_unit, PoolUnit::Meters);
    assert_eq!(swim.total_distance_m, 1_400.0);

    let labels: Vec<&SetLabel> = swim.detected_sets.iter().map(|s| &s.label).collect();
    assert_eq!(
        labels,
        vec![
            &SetLabel::WarmUp,
            &SetLabel::Main,
            &SetLabel::Other("4 x 50 m".to_string()),
            &SetLabel::CoolDown
        ]
    );

    let main = &swim.detected_sets[1];
    assert_eq!(main.repeat_count, 8);
    assert_eq!(main.unit_distance_m, 100.0);

    // 56 lengths, 1544 s, 800 strokes
    assert_eq!(swim.swolf, Some(42));
    assert_eq!(swim.splits.len(), 14);
    assert_eq!(swim.splits[2].duration_s, 100.0);

    assert_eq!(
        swim.summary_lines,
        vec![
            "Warm-up: 200 m @ 2:00/100m".to_string(),
            "Main set: 8 x 100 m @ 1:40/100m (±0.0s)".to_string(),
            "4 x 50 m @ 2:08/100m".to_string(),
            "Cool-down: 200 m @ 2:04/100m".to_string(),
            "Total: 1400 m in 25:44 @ 1:50/100m".to_string(),
            "SWOLF: 42".to_string(),
        ]
    );
}

#[test]
fn test_plan_target_overrides_inference() {
    let request = AnalysisRequest {
        pool: PoolLengthHints {
            plan_target_m: Some(50.0),
            ..Default::default()
        },
        ..Default::default()
    };
    let swim = analyze(&swim_bundle(), &request).unwrap().swim.unwrap();

    assert_eq!(swim.pool_length_meters, 50.0);
    assert_eq!(swim.pool_length_source, PoolLengthSource::TrainingPlan);
    // 100 m splits are two lengths in a 50 m pool
    assert_eq!(swim.splits.len(), 28);
}

#[test]
fn test_free_swim_laps_only() {
    let laps = vec![
        SwimLength {
            distance_m: 750.0,
            duration_s: 840.0,
            stroke_count: None,
            avg_heart_rate: Some(142.0),
        },
        SwimLength {
            distance_m: 750.0,
            duration_s: 860.0,
            stroke_count: None,
            avg_heart_rate: Some(148.0),
        },
    ];
    let bundle = TelemetryBundle {
        laps: Some(laps),
        ..Default::default()
    };
    let request = AnalysisRequest {
        units: Units::Imperial,
        ..Default::default()
    };

    let swim = analyze(&bundle, &request).unwrap().swim.unwrap();

    assert!(swim.detected_sets.is_empty());
    assert!(swim.splits.is_empty());
    assert_eq!(swim.pool_length_source, PoolLengthSource::Default);
    assert!(swim.summary_lines[0].starts_with("Total: 1640 yd in 28:20"));
}

#[test]
fn test_swim_result_serializes() {
    let analysis = analyze(&swim_bundle(), &AnalysisRequest::default()).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["swim"]["pool_length_source"], "inferred");
    assert_eq!(json["swim"]["detected_sets"][0]["label"], "warm-up");
    assert_eq!(json["swim"]["pool_unit"], "meters");
}

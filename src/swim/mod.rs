//! Pool swim analysis: pool length, set detection, splits and SWOLF.

pub mod pool;
pub mod sets;
pub mod stats;

pub use pool::{resolve_pool_length, PoolLengthHints, PoolLengthSource, PoolUnit, ResolvedPool};
pub use sets::{DetectedSet, SetDetector, SetLabel};
pub use stats::{fixed_splits, stroke_stats, swolf, Split, StrokeStats};

use crate::config::{SwimSettings, Units};
use crate::format::{format_duration, format_swim_distance, format_swim_pace, format_swim_spread};
use serde::{Deserialize, Serialize};
use stats::{pace_per_100m, sum_strokes};

/// One pool length or lap as recorded by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimLength {
    /// Distance covered; zero for a rest interval
    pub distance_m: f64,
    /// Elapsed time in seconds
    pub duration_s: f64,
    /// Strokes counted by the device
    #[serde(default)]
    pub stroke_count: Option<u32>,
    /// Mean heart rate in bpm
    #[serde(default)]
    pub avg_heart_rate: Option<f64>,
}

impl SwimLength {
    /// Rest intervals are recorded with zero distance.
    pub fn is_active(&self) -> bool {
        self.distance_m > 0.0 && self.duration_s.is_finite() && self.duration_s >= 0.0
    }
}

/// Build laps from lengths by splitting on rest intervals.
pub fn laps_from_lengths(lengths: &[SwimLength]) -> Vec<SwimLength> {
    let mut laps = Vec::new();
    for group in lengths.split(|l| !l.is_active()) {
        if group.is_empty() {
            continue;
        }
        let heart_rates: Vec<f64> = group.iter().filter_map(|l| l.avg_heart_rate).collect();
        laps.push(SwimLength {
            distance_m: group.iter().map(|l| l.distance_m).sum(),
            duration_s: group.iter().map(|l| l.duration_s).sum(),
            stroke_count: sum_strokes(group),
            avg_heart_rate: (!heart_rates.is_empty())
                .then(|| heart_rates.iter().sum::<f64>() / heart_rates.len() as f64),
        });
    }
    laps
}

/// Swim analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimSets {
    /// Human-readable summary, one line per set, then totals and SWOLF
    pub summary_lines: Vec<String>,
    /// Sets in lap order
    pub detected_sets: Vec<DetectedSet>,
    /// Fixed-distance splits, empty without per-length records
    pub splits: Vec<Split>,
    /// Whole-swim SWOLF
    pub swolf: Option<u32>,
    /// Resolved pool length in meters
    pub pool_length_meters: f64,
    /// Where the pool length came from
    pub pool_length_source: PoolLengthSource,
    /// Meters or yards, from the pool length
    pub pool_unit: PoolUnit,
    /// Stroke counts and rates
    pub stroke_stats: StrokeStats,
    /// Distance over active laps
    pub total_distance_m: f64,
    /// Swimming time over active laps, rest excluded
    pub total_duration_s: f64,
    /// Seconds per 100 m over the whole swim
    pub avg_pace_per_100m: Option<f64>,
}

/// Runs the swim stages over length and lap records.
#[derive(Debug, Clone, Default)]
pub struct SwimAnalyzer {
    settings: SwimSettings,
}

impl SwimAnalyzer {
    pub fn new(settings: SwimSettings) -> Self {
        Self { settings }
    }

    /// Analyze a pool swim.
    ///
    /// Laps are used for set detection; when none are given they are built
    /// from the lengths. Returns `None` when there is nothing to analyze.
    pub fn analyze(
        &self,
        lengths: Option<&[SwimLength]>,
        laps: Option<&[SwimLength]>,
        hints: &PoolLengthHints,
        units: Units,
    ) -> Option<SwimSets> {
        let lengths = lengths.unwrap_or_default();
        let laps = match laps {
            Some(laps) if !laps.is_empty() => laps.to_vec(),
            _ => laps_from_lengths(lengths),
        };
        if laps.is_empty() {
            return None;
        }

        let active_lengths: Vec<SwimLength> =
            lengths.iter().filter(|l| l.is_active()).cloned().collect();

        let mut hints = hints.clone();
        if !active_lengths.is_empty() {
            hints.total_distance_m = hints
                .total_distance_m
                .or_else(|| Some(active_lengths.iter().map(|l| l.distance_m).sum()));
            hints.length_count = hints.length_count.or(Some(active_lengths.len()));
        }
        let pool = resolve_pool_length(&hints, &self.settings);

        let (total_distance_m, total_duration_s) = laps
            .iter()
            .filter(|l| l.is_active())
            .fold((0.0, 0.0), |(distance, duration), l| {
                (distance + l.distance_m, duration + l.duration_s)
            });

        // Per-length data wins; otherwise lengths are counted from distance
        let (count_source, length_count) = if active_lengths.is_empty() {
            (laps.as_slice(), (total_distance_m / pool.length_m).round() as usize)
        } else {
            (active_lengths.as_slice(), active_lengths.len())
        };
        let stroke_stats = stroke_stats(count_source, length_count);
        let swolf = swolf(
            length_count,
            Some(total_duration_s),
            stroke_stats.total_strokes.unwrap_or(0),
        );

        let detected_sets = SetDetector::new(&self.settings, pool.unit).detect(&laps);
        let splits = fixed_splits(&active_lengths, &pool, self.settings.split_units);
        let avg_pace_per_100m = pace_per_100m(total_distance_m, total_duration_s);

        let mut summary_lines: Vec<String> = detected_sets
            .iter()
            .map(|set| set_line(set, units))
            .collect();
        summary_lines.push(format!(
            "Total: {} in {} @ {}",
            format_swim_distance(total_distance_m, units),
            format_duration(total_duration_s),
            format_swim_pace(avg_pace_per_100m, units)
        ));
        if let Some(score) = swolf {
            summary_lines.push(format!("SWOLF: {}", score));
        }

        tracing::debug!(
            laps = laps.len(),
            lengths = active_lengths.len(),
            sets = detected_sets.len(),
            splits = splits.len(),
            "Analyzed swim"
        );

        Some(SwimSets {
            summary_lines,
            detected_sets,
            splits,
            swolf,
            pool_length_meters: pool.length_m,
            pool_length_source: pool.source,
            pool_unit: pool.unit,
            stroke_stats,
            total_distance_m,
            total_duration_s,
            avg_pace_per_100m,
        })
    }
}

fn set_line(set: &DetectedSet, units: Units) -> String {
    let pace = format_swim_pace(set.avg_pace_per_100m, units);
    match &set.label {
        SetLabel::WarmUp => format!(
            "Warm-up: {} @ {}",
            format_swim_distance(set.total_distance_m, units),
            pace
        ),
        SetLabel::CoolDown => format!(
            "Cool-down: {} @ {}",
            format_swim_distance(set.total_distance_m, units),
            pace
        ),
        SetLabel::Main => {
            let spread = set
                .consistency_spread_s
                .map(|s| format!(" ({})", format_swim_spread(s, units)))
                .unwrap_or_default();
            format!(
                "Main set: {} x {} @ {}{}",
                set.repeat_count,
                format_swim_distance(set.unit_distance_m, units),
                pace,
                spread
            )
        }
        SetLabel::Other(label) => format!("{} @ {}", label, pace),
    }
}

//! SWOLF, fixed-distance splits and stroke statistics.

use super::pool::ResolvedPool;
use super::SwimLength;
use serde::{Deserialize, Serialize};

/// SWOLF efficiency score.
///
/// Average seconds per length plus average strokes per length, rounded.
/// `None` when there are no lengths or no usable duration.
pub fn swolf(
    length_count: usize,
    total_duration_s: Option<f64>,
    total_strokes: u32,
) -> Option<u32> {
    if length_count == 0 {
        return None;
    }
    let duration = total_duration_s.filter(|d| d.is_finite() && *d > 0.0)?;
    let count = length_count as f64;
    Some((duration / count + f64::from(total_strokes) / count).round() as u32)
}

/// Seconds per 100 m for a stretch of swimming.
pub fn pace_per_100m(distance_m: f64, duration_s: f64) -> Option<f64> {
    if distance_m > 0.0 && duration_s > 0.0 {
        Some(duration_s / distance_m * 100.0)
    } else {
        None
    }
}

/// One fixed-distance split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Zero-based split number
    pub index: usize,
    /// Distance covered in the split
    pub distance_m: f64,
    /// Elapsed time of the split
    pub duration_s: f64,
    /// Seconds per 100 m
    pub pace_per_100m: Option<f64>,
    /// Total strokes, when any length reported a count
    pub stroke_count: Option<u32>,
    /// SWOLF over the lengths of this split
    pub swolf: Option<u32>,
}

/// Group active lengths into fixed-distance splits.
///
/// A split covers `split_units` pool units (100 m in a metric pool, 100 yd in
/// a yard pool). A trailing partial split is dropped.
pub fn fixed_splits(lengths: &[SwimLength], pool: &ResolvedPool, split_units: f64) -> Vec<Split> {
    if pool.length_m <= 0.0 || split_units <= 0.0 {
        return Vec::new();
    }
    let per_split = ((split_units * pool.unit.meters()) / pool.length_m)
        .round()
        .max(1.0) as usize;

    let active: Vec<&SwimLength> = lengths.iter().filter(|l| l.is_active()).collect();

    active
        .chunks_exact(per_split)
        .enumerate()
        .map(|(index, chunk)| {
            let distance_m: f64 = chunk.iter().map(|l| l.distance_m).sum();
            let duration_s: f64 = chunk.iter().map(|l| l.duration_s).sum();
            let stroke_count = sum_strokes(chunk.iter().copied());
            Split {
                index,
                distance_m,
                duration_s,
                pace_per_100m: pace_per_100m(distance_m, duration_s),
                stroke_count,
                swolf: swolf(chunk.len(), Some(duration_s), stroke_count.unwrap_or(0)),
            }
        })
        .collect()
}

/// Stroke rate summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeStats {
    /// Strokes counted across the activity
    pub total_strokes: Option<u32>,
    /// Mean strokes per pool length
    pub strokes_per_length: Option<f64>,
    /// Strokes per minute of swimming
    pub strokes_per_minute: Option<f64>,
}

/// Stroke rate over `entries`, which cover `length_count` pool lengths.
pub fn stroke_stats(entries: &[SwimLength], length_count: usize) -> StrokeStats {
    let active: Vec<&SwimLength> = entries.iter().filter(|l| l.is_active()).collect();
    let Some(total) = sum_strokes(active.iter().copied()) else {
        return StrokeStats::default();
    };

    // Only time spent on lengths with a count contributes to the rate
    let counted_duration: f64 = active
        .iter()
        .filter(|l| l.stroke_count.is_some())
        .map(|l| l.duration_s)
        .sum();

    StrokeStats {
        total_strokes: Some(total),
        strokes_per_length: (length_count > 0).then(|| f64::from(total) / length_count as f64),
        strokes_per_minute: (counted_duration > 0.0)
            .then(|| f64::from(total) / (counted_duration / 60.0)),
    }
}

/// Sum of known stroke counts, `None` when no entry has one.
pub(crate) fn sum_strokes<'a>(entries: impl IntoIterator<Item = &'a SwimLength>) -> Option<u32> {
    entries
        .into_iter()
        .filter_map(|l| l.stroke_count)
        .fold(None, |acc, n| Some(acc.unwrap_or(0).saturating_add(n)))
}

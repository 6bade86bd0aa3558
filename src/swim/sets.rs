//! Structured set detection over pool laps.
//!
//! Lap distances are bucketed in pool units. The most common bucket is the
//! main set candidate; ties go to the longer distance. Laps within tolerance
//! of the main distance form the main set, the first and last remaining laps
//! become warm-up and cool-down, and anything else is grouped into runs of
//! equal distance.

use super::pool::PoolUnit;
use super::stats::pace_per_100m;
use super::SwimLength;
use crate::config::SwimSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role of a detected set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SetLabel {
    WarmUp,
    Main,
    CoolDown,
    /// Free-form description such as `4 x 50 m`
    Other(String),
}

impl SetLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::WarmUp => "warm-up",
            Self::Main => "main",
            Self::CoolDown => "cool-down",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for SetLabel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "warm-up" => Self::WarmUp,
            "main" => Self::Main,
            "cool-down" => Self::CoolDown,
            _ => Self::Other(value),
        }
    }
}

impl From<SetLabel> for String {
    fn from(label: SetLabel) -> Self {
        label.as_str().to_string()
    }
}

impl std::fmt::Display for SetLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of laps identified as one set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSet {
    pub label: SetLabel,
    /// Number of laps in the set
    pub repeat_count: usize,
    /// Nominal distance of one repeat
    pub unit_distance_m: f64,
    pub total_distance_m: f64,
    pub total_duration_s: f64,
    /// Mean of the per-lap paces, seconds per 100 m
    pub avg_pace_per_100m: Option<f64>,
    /// Mean absolute deviation of the per-lap paces, seconds per 100 m
    pub consistency_spread_s: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    /// Indices into the lap list
    pub lap_indices: Vec<usize>,
}

/// Detects warm-up, main and cool-down sets.
#[derive(Debug, Clone)]
pub struct SetDetector {
    unit: PoolUnit,
    bucket_units: f64,
    tolerance_fraction: f64,
    min_tolerance_units: f64,
    min_main_repeats: usize,
}

impl SetDetector {
    pub fn new(settings: &SwimSettings, unit: PoolUnit) -> Self {
        Self {
            unit,
            bucket_units: settings.bucket_units,
            tolerance_fraction: settings.tolerance_fraction,
            min_tolerance_units: settings.min_tolerance_units,
            min_main_repeats: settings.min_main_repeats,
        }
    }

    fn units(&self, distance_m: f64) -> f64 {
        distance_m / self.unit.meters()
    }

    fn bucket(&self, distance_m: f64) -> i64 {
        (self.units(distance_m) / self.bucket_units).round() as i64
    }

    /// Detect sets in `laps`.
    ///
    /// Returns an empty list when no bucket reaches the minimum repeat count;
    /// callers then fall back to an aggregate summary.
    pub fn detect(&self, laps: &[SwimLength]) -> Vec<DetectedSet> {
        let active: Vec<usize> = (0..laps.len()).filter(|&i| laps[i].is_active()).collect();
        if active.is_empty() || self.bucket_units <= 0.0 {
            return Vec::new();
        }

        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for &i in &active {
            let key = self.bucket(laps[i].distance_m);
            if key > 0 {
                *counts.entry(key).or_default() += 1;
            }
        }

        // Larger keys come later, so max_by_key picks the longer distance on ties
        let Some((&main_key, &main_count)) = counts.iter().max_by_key(|&(_, count)| *count) else {
            return Vec::new();
        };
        if main_count < self.min_main_repeats {
            tracing::debug!(main_count, "No bucket reached the main set repeat count");
            return Vec::new();
        }

        let main_units = main_key as f64 * self.bucket_units;
        let tolerance = (self.tolerance_fraction * main_units).max(self.min_tolerance_units);
        let in_main = |i: usize| (self.units(laps[i].distance_m) - main_units).abs() <= tolerance;

        let main: Vec<usize> = active.iter().copied().filter(|&i| in_main(i)).collect();
        if main.len() < self.min_main_repeats {
            return Vec::new();
        }

        let mut sets = vec![self.build(
            SetLabel::Main,
            laps,
            main,
            main_units * self.unit.meters(),
        )];

        let first = active[0];
        let last = active[active.len() - 1];
        let warm_up = (!in_main(first)).then_some(first);
        let cool_down = (!in_main(last) && last != first).then_some(last);

        if let Some(i) = warm_up {
            sets.push(self.build(SetLabel::WarmUp, laps, vec![i], laps[i].distance_m));
        }
        if let Some(i) = cool_down {
            sets.push(self.build(SetLabel::CoolDown, laps, vec![i], laps[i].distance_m));
        }

        // Remaining laps grouped into contiguous runs of the same bucket
        let mut run: Vec<usize> = Vec::new();
        let mut run_key = None;
        for &i in &active {
            let leftover = !in_main(i) && Some(i) != warm_up && Some(i) != cool_down;
            let key = self.bucket(laps[i].distance_m);
            if !leftover || run_key != Some(key) {
                if !run.is_empty() {
                    sets.push(self.other_set(laps, std::mem::take(&mut run)));
                }
                run_key = None;
            }
            if leftover {
                run.push(i);
                run_key = Some(key);
            }
        }
        if !run.is_empty() {
            sets.push(self.other_set(laps, run));
        }

        sets.sort_by_key(|set| set.lap_indices.first().copied().unwrap_or(usize::MAX));
        tracing::debug!(
            sets = sets.len(),
            main_units,
            repeats = main_count,
            "Detected swim sets"
        );
        sets
    }

    fn other_set(&self, laps: &[SwimLength], indices: Vec<usize>) -> DetectedSet {
        let mean_m =
            indices.iter().map(|&i| laps[i].distance_m).sum::<f64>() / indices.len() as f64;
        let unit_units = self.units(mean_m).round();
        let label = SetLabel::Other(format!(
            "{} x {} {}",
            indices.len(),
            unit_units,
            self.unit.abbreviation()
        ));
        self.build(label, laps, indices, unit_units * self.unit.meters())
    }

    fn build(
        &self,
        label: SetLabel,
        laps: &[SwimLength],
        indices: Vec<usize>,
        unit_distance_m: f64,
    ) -> DetectedSet {
        let paces: Vec<f64> = indices
            .iter()
            .filter_map(|&i| pace_per_100m(laps[i].distance_m, laps[i].duration_s))
            .collect();
        let avg_pace = mean(&paces);
        let spread = avg_pace.map(|avg| {
            paces.iter().map(|p| (p - avg).abs()).sum::<f64>() / paces.len() as f64
        });

        let heart_rates: Vec<f64> = indices
            .iter()
            .filter_map(|&i| laps[i].avg_heart_rate)
            .collect();

        DetectedSet {
            label,
            repeat_count: indices.len(),
            unit_distance_m,
            total_distance_m: indices.iter().map(|&i| laps[i].distance_m).sum(),
            total_duration_s: indices.iter().map(|&i| laps[i].duration_s).sum(),
            avg_pace_per_100m: avg_pace,
            consistency_spread_s: spread,
            avg_heart_rate: mean(&heart_rates),
            lap_indices: indices,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

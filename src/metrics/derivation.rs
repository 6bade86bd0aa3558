//! Per-sample metric derivation: windowed pace and VAM.

use super::window::{trailing_map, WindowSpan};
use crate::config::{AnalysisConfig, SpeedBounds};
use crate::series::CanonicalSeries;

/// Seconds per hour.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Derives pace and VAM columns from a resolved series.
#[derive(Debug, Clone)]
pub struct MetricDeriver {
    /// Pace window in seconds
    pace_window_s: f64,
    /// VAM window in seconds
    vam_window_s: f64,
    /// VAM below this (m/h) is dropped as noise
    vam_noise_floor: f64,
    /// Plausible speed range for pace
    speed_bounds: SpeedBounds,
}

impl MetricDeriver {
    /// Create a deriver from analysis configuration.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            pace_window_s: config.windows.pace_window_s,
            vam_window_s: config.windows.vam_window_s,
            vam_noise_floor: config.windows.vam_noise_floor_m_per_h,
            speed_bounds: config.speed_bounds,
        }
    }

    /// Fill the pace and VAM columns in place.
    pub fn derive(&self, series: &mut CanonicalSeries) {
        series.pace_s_per_km = windowed_pace(
            &series.time_s,
            &series.distance_m,
            self.pace_window_s,
            self.speed_bounds,
        );
        series.vam_m_per_h = windowed_vam(
            &series.time_s,
            &series.elevation_m,
            self.vam_window_s,
            self.vam_noise_floor,
        );

        tracing::debug!(
            pace_samples = series.pace_s_per_km.iter().flatten().count(),
            vam_samples = series.vam_m_per_h.iter().flatten().count(),
            "Derived windowed metrics"
        );
    }
}

impl Default for MetricDeriver {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Windowed pace in seconds per kilometer.
///
/// Speed over each trailing window is `delta distance / delta time`; pace is
/// its reciprocal. Windows whose speed falls outside `bounds` give `None`,
/// which drops GPS jitter and jumps instead of reporting a spike.
pub fn windowed_pace(
    time: &[f64],
    distance: &[f64],
    window_s: f64,
    bounds: SpeedBounds,
) -> Vec<Option<f64>> {
    trailing_map(time, window_s, |span: WindowSpan| {
        let meters = distance[span.end] - distance[span.start];
        let speed_mps = meters / span.duration_s;
        if !bounds.contains_mps(speed_mps) {
            return None;
        }
        Some(1000.0 / speed_mps)
    })
}

/// Vertical ascent rate in meters per hour.
///
/// Only net climbing over the window counts. Windows with a missing
/// elevation at either end, a net descent, or a rate under `noise_floor`
/// give `None`.
pub fn windowed_vam(
    time: &[f64],
    elevation: &[Option<f64>],
    window_s: f64,
    noise_floor: f64,
) -> Vec<Option<f64>> {
    trailing_map(time, window_s, |span: WindowSpan| {
        let gain = elevation[span.end]? - elevation[span.start]?;
        if gain <= 0.0 {
            return None;
        }
        let vam = gain / (span.duration_s / SECONDS_PER_HOUR);
        (vam >= noise_floor).then_some(vam)
    })
}

//! Distance and elevation resolution.

use super::CanonicalSeries;
use crate::config::AnalysisConfig;
use crate::metrics::smoothing::smooth_trace;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
const EARTH_RADIUS: f64 = 6_371_000.0;

/// Where the distance column came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    /// Every point carried a device distance
    Reported,
    /// Accumulated from GPS fixes
    Haversine,
    /// Partial device distances carried forward (no positions available)
    CarriedForward,
    /// No distance information at all
    #[default]
    None,
}

/// Calculate horizontal distance between two GPS points (Haversine formula)
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS * c
}

/// Fills `distance_m` and the smoothed `elevation_m` column.
#[derive(Debug, Clone)]
pub struct ElevationResolver {
    /// EMA smoothing factor for elevation
    alpha: f64,
}

impl ElevationResolver {
    /// Create a resolver with the given elevation smoothing factor.
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Create a resolver from analysis configuration.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.smoothing.elevation_alpha)
    }

    /// Resolve distance and smoothed elevation in place.
    pub fn resolve(&self, series: &mut CanonicalSeries) -> DistanceSource {
        let source = resolve_distance(series);
        self.smooth_elevation(series);

        tracing::debug!(
            ?source,
            distance_m = series.total_distance_m(),
            "Resolved distance and elevation"
        );
        source
    }

    /// Apply the causal EMA to the raw elevation trace.
    pub fn smooth_elevation(&self, series: &mut CanonicalSeries) {
        series.elevation_m = smooth_trace(&series.raw_elevation_m, self.alpha);
    }
}

impl Default for ElevationResolver {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Pick a distance source and fill `distance_m`.
fn resolve_distance(series: &mut CanonicalSeries) -> DistanceSource {
    if series.is_empty() {
        return DistanceSource::None;
    }

    if series.reported_distance_m.iter().all(Option::is_some) {
        series.distance_m = carry_forward(&series.reported_distance_m);
        return DistanceSource::Reported;
    }

    let has_positions = series
        .latitude
        .iter()
        .zip(&series.longitude)
        .any(|(lat, lon)| lat.is_some() && lon.is_some());
    if has_positions {
        series.distance_m = accumulate_haversine(&series.latitude, &series.longitude);
        return DistanceSource::Haversine;
    }

    if series.reported_distance_m.iter().any(Option::is_some) {
        series.distance_m = carry_forward(&series.reported_distance_m);
        return DistanceSource::CarriedForward;
    }

    series.distance_m = vec![0.0; series.len()];
    DistanceSource::None
}

/// Cumulative haversine distance. A step with a missing coordinate on either
/// side contributes zero.
fn accumulate_haversine(latitude: &[Option<f64>], longitude: &[Option<f64>]) -> Vec<f64> {
    let mut total = 0.0;
    let mut distances = Vec::with_capacity(latitude.len());
    distances.push(0.0);

    for i in 1..latitude.len() {
        if let (Some(lat1), Some(lon1), Some(lat2), Some(lon2)) =
            (latitude[i - 1], longitude[i - 1], latitude[i], longitude[i])
        {
            total += haversine_distance(lat1, lon1, lat2, lon2);
        }
        distances.push(total);
    }

    distances
}

/// Reported distances as a non-decreasing column. Gaps and dips hold the
/// previous value.
fn carry_forward(reported: &[Option<f64>]) -> Vec<f64> {
    let mut current = 0.0_f64;
    reported
        .iter()
        .map(|value| {
            if let Some(v) = value {
                current = current.max(*v);
            }
            current
        })
        .collect()
}

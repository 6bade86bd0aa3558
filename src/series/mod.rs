//! Canonical activity series and the stages that build it.
//!
//! Raw telemetry arrives as loosely-shaped JSON records. The normalizer
//! resolves them into typed points, the resolver fills distance and the
//! smoothed elevation trace, and the downsampler bounds the result for
//! transport.

pub mod downsample;
pub mod fields;
pub mod normalizer;
pub mod resolver;

pub use downsample::downsample;
pub use fields::{FieldCandidate, FieldSpec, FieldUnit};
pub use normalizer::{normalize, normalize_timestamp, SeriesNormalizer};
pub use resolver::{haversine_distance, DistanceSource, ElevationResolver};

use crate::metrics::error::{AnalyticsError, AnalyticsResult};
use crate::swim::SwimLength;
use serde::{Deserialize, Serialize};

/// A raw telemetry record as produced by a capture device or provider API.
///
/// Field names and units vary between sources; see [`fields`] for the
/// names that are recognized.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A GPS fix after field resolution. All values are SI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    /// Absolute timestamp in seconds
    pub timestamp_s: Option<f64>,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// Unsmoothed elevation in meters
    pub elevation_m: Option<f64>,
    /// Cumulative distance reported by the device
    pub distance_m: Option<f64>,
    /// Instantaneous speed in m/s
    pub speed_mps: Option<f64>,
    /// Embedded heart rate
    pub hr_bpm: Option<f64>,
    /// Embedded cadence
    pub cadence: Option<f64>,
    /// Embedded power
    pub power_w: Option<f64>,
}

/// A sensor sample after field resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Absolute timestamp in seconds
    pub timestamp_s: Option<f64>,
    /// Heart rate in bpm
    pub hr_bpm: Option<f64>,
    /// Power in watts
    pub power_w: Option<f64>,
    /// Cadence in rpm (or spm for running)
    pub cadence: Option<f64>,
}

/// Everything the engine receives for one activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryBundle {
    /// GPS fixes
    #[serde(default)]
    pub points: Vec<RawRecord>,
    /// Separate sensor stream
    #[serde(default)]
    pub samples: Vec<RawRecord>,
    /// Pool-swim length records
    #[serde(default)]
    pub lengths: Option<Vec<SwimLength>>,
    /// Pool-swim lap records
    #[serde(default)]
    pub laps: Option<Vec<SwimLength>>,
}

/// Index-aligned, time-ordered activity series.
///
/// Every column has the same length as `time_s`. `time_s` and `distance_m`
/// never decrease.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSeries {
    /// Seconds from activity start
    pub time_s: Vec<f64>,
    /// Cumulative distance in meters
    pub distance_m: Vec<f64>,
    /// Latitude in degrees
    pub latitude: Vec<Option<f64>>,
    /// Longitude in degrees
    pub longitude: Vec<Option<f64>>,
    /// Cumulative distance as reported by the device
    pub reported_distance_m: Vec<Option<f64>>,
    /// Unsmoothed elevation in meters
    pub raw_elevation_m: Vec<Option<f64>>,
    /// Smoothed elevation in meters
    pub elevation_m: Vec<Option<f64>>,
    /// Device-reported speed in m/s
    pub speed_mps: Vec<Option<f64>>,
    /// Windowed pace in seconds per kilometer
    pub pace_s_per_km: Vec<Option<f64>>,
    /// Vertical ascent rate in meters per hour
    pub vam_m_per_h: Vec<Option<f64>>,
    /// Heart rate in bpm
    pub hr_bpm: Vec<Option<f64>>,
    /// Power in watts
    pub power_w: Vec<Option<f64>>,
    /// Cadence
    pub cadence: Vec<Option<f64>>,
}

impl CanonicalSeries {
    /// An empty series with room for `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            time_s: Vec::with_capacity(capacity),
            distance_m: Vec::with_capacity(capacity),
            latitude: Vec::with_capacity(capacity),
            longitude: Vec::with_capacity(capacity),
            reported_distance_m: Vec::with_capacity(capacity),
            raw_elevation_m: Vec::with_capacity(capacity),
            elevation_m: Vec::with_capacity(capacity),
            speed_mps: Vec::with_capacity(capacity),
            pace_s_per_km: Vec::with_capacity(capacity),
            vam_m_per_h: Vec::with_capacity(capacity),
            hr_bpm: Vec::with_capacity(capacity),
            power_w: Vec::with_capacity(capacity),
            cadence: Vec::with_capacity(capacity),
        }
    }

    /// Build a series from the core columns, checking alignment and order.
    ///
    /// Derived columns (smoothed elevation, pace, VAM) and position columns
    /// start as all `None`.
    pub fn from_columns(
        time_s: Vec<f64>,
        distance_m: Vec<f64>,
        raw_elevation_m: Vec<Option<f64>>,
        hr_bpm: Vec<Option<f64>>,
        power_w: Vec<Option<f64>>,
        cadence: Vec<Option<f64>>,
    ) -> AnalyticsResult<Self> {
        let len = time_s.len();
        let series = Self {
            time_s,
            distance_m,
            latitude: vec![None; len],
            longitude: vec![None; len],
            reported_distance_m: vec![None; len],
            raw_elevation_m,
            elevation_m: vec![None; len],
            speed_mps: vec![None; len],
            pace_s_per_km: vec![None; len],
            vam_m_per_h: vec![None; len],
            hr_bpm,
            power_w,
            cadence,
        };
        series.validate()?;
        Ok(series)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    /// Check if the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    /// Elapsed time from first to last sample.
    pub fn duration_s(&self) -> f64 {
        match (self.time_s.first(), self.time_s.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Final cumulative distance.
    pub fn total_distance_m(&self) -> f64 {
        self.distance_m.last().copied().unwrap_or(0.0)
    }

    /// Check column alignment and monotonicity.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let expected = self.time_s.len();
        let lengths: [(&'static str, usize); 12] = [
            ("distance_m", self.distance_m.len()),
            ("latitude", self.latitude.len()),
            ("longitude", self.longitude.len()),
            ("reported_distance_m", self.reported_distance_m.len()),
            ("raw_elevation_m", self.raw_elevation_m.len()),
            ("elevation_m", self.elevation_m.len()),
            ("speed_mps", self.speed_mps.len()),
            ("pace_s_per_km", self.pace_s_per_km.len()),
            ("vam_m_per_h", self.vam_m_per_h.len()),
            ("hr_bpm", self.hr_bpm.len()),
            ("power_w", self.power_w.len()),
            ("cadence", self.cadence.len()),
        ];
        for (column, actual) in lengths {
            if actual != expected {
                return Err(AnalyticsError::MismatchedLengths {
                    column,
                    expected,
                    actual,
                });
            }
        }

        if let Some(index) = first_decrease(&self.time_s) {
            return Err(AnalyticsError::NonMonotonic {
                column: "time_s",
                index,
            });
        }
        if let Some(index) = first_decrease(&self.distance_m) {
            return Err(AnalyticsError::NonMonotonic {
                column: "distance_m",
                index,
            });
        }
        Ok(())
    }

    /// Keep only the given sample indices, in order.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        fn pick<T: Copy>(column: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| column[i]).collect()
        }

        Self {
            time_s: pick(&self.time_s, indices),
            distance_m: pick(&self.distance_m, indices),
            latitude: pick(&self.latitude, indices),
            longitude: pick(&self.longitude, indices),
            reported_distance_m: pick(&self.reported_distance_m, indices),
            raw_elevation_m: pick(&self.raw_elevation_m, indices),
            elevation_m: pick(&self.elevation_m, indices),
            speed_mps: pick(&self.speed_mps, indices),
            pace_s_per_km: pick(&self.pace_s_per_km, indices),
            vam_m_per_h: pick(&self.vam_m_per_h, indices),
            hr_bpm: pick(&self.hr_bpm, indices),
            power_w: pick(&self.power_w, indices),
            cadence: pick(&self.cadence, indices),
        }
    }
}

/// Index of the first element smaller than its predecessor.
fn first_decrease(values: &[f64]) -> Option<usize> {
    values
        .windows(2)
        .position(|pair| pair[1] < pair[0])
        .map(|i| i + 1)
}

//! Series normalizer: raw records to a canonical, time-ordered series.

use super::fields::{
    CADENCE, DISTANCE, ELEVATION, HEART_RATE, LATITUDE, LONGITUDE, POWER, SPEED, TIMESTAMP,
};
use super::{CanonicalSeries, RawPoint, RawRecord, SensorSample};
use crate::config::AnalysisConfig;

/// Timestamps above this are millisecond-epoch values.
pub const MILLIS_EPOCH_THRESHOLD: f64 = 1e12;

/// Convert a timestamp to seconds.
///
/// Values greater than `1e12` are taken as millisecond-epoch.
pub fn normalize_timestamp(value: f64) -> f64 {
    if value > MILLIS_EPOCH_THRESHOLD {
        value / 1000.0
    } else {
        value
    }
}

impl RawPoint {
    /// Resolve a GPS fix from a raw record.
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            timestamp_s: TIMESTAMP.resolve(record),
            latitude: LATITUDE.resolve(record),
            longitude: LONGITUDE.resolve(record),
            elevation_m: ELEVATION.resolve(record),
            distance_m: DISTANCE.resolve(record),
            speed_mps: SPEED.resolve(record),
            hr_bpm: HEART_RATE.resolve(record),
            cadence: CADENCE.resolve(record),
            power_w: POWER.resolve(record),
        }
    }
}

impl SensorSample {
    /// Resolve a sensor sample from a raw record.
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            timestamp_s: TIMESTAMP.resolve(record),
            hr_bpm: HEART_RATE.resolve(record),
            power_w: POWER.resolve(record),
            cadence: CADENCE.resolve(record),
        }
    }
}

impl From<SensorSample> for RawPoint {
    fn from(sample: SensorSample) -> Self {
        Self {
            timestamp_s: sample.timestamp_s,
            hr_bpm: sample.hr_bpm,
            power_w: sample.power_w,
            cadence: sample.cadence,
            ..Default::default()
        }
    }
}

/// A sensor sample with a resolved timestamp.
struct TimedSample {
    timestamp_s: f64,
    sample: SensorSample,
}

/// Builds a [`CanonicalSeries`] from raw point and sample records.
#[derive(Debug, Clone)]
pub struct SeriesNormalizer {
    /// Maximum time gap for joining a sensor sample to a fix
    sensor_tolerance_s: f64,
}

impl SeriesNormalizer {
    /// Create a normalizer with the given join tolerance.
    pub fn new(sensor_tolerance_s: f64) -> Self {
        Self { sensor_tolerance_s }
    }

    /// Create a normalizer from analysis configuration.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.join.sensor_tolerance_s)
    }

    /// Normalize raw records into a canonical series.
    ///
    /// Distance is left at zero and the smoothed elevation column empty;
    /// the resolver fills both. Records without a usable timestamp cannot
    /// be placed on the time axis and are dropped.
    pub fn normalize(&self, points: &[RawRecord], samples: &[RawRecord]) -> CanonicalSeries {
        let mut fixes: Vec<RawPoint> = points.iter().map(RawPoint::from_record).collect();
        let untimed_points = drop_untimed(&mut fixes, |p| p.timestamp_s);

        let mut sensors: Vec<TimedSample> = samples
            .iter()
            .map(SensorSample::from_record)
            .filter_map(|sample| {
                sample.timestamp_s.map(|timestamp_s| TimedSample {
                    timestamp_s,
                    sample,
                })
            })
            .collect();
        let untimed_samples = samples.len() - sensors.len();

        if untimed_points > 0 || untimed_samples > 0 {
            tracing::warn!(
                untimed_points,
                untimed_samples,
                "Dropped records without a usable timestamp"
            );
        }

        sensors.sort_by(|a, b| a.timestamp_s.total_cmp(&b.timestamp_s));

        // Indoor sessions have no fixes; the sensor stream is the series.
        if fixes.is_empty() {
            fixes = sensors.drain(..).map(|t| RawPoint::from(t.sample)).collect();
        }

        if fixes.is_empty() {
            tracing::debug!("No timed telemetry, returning empty series");
            return CanonicalSeries::default();
        }

        fixes.sort_by(|a, b| {
            let ta = a.timestamp_s.unwrap_or_default();
            let tb = b.timestamp_s.unwrap_or_default();
            ta.total_cmp(&tb)
        });

        let start = fixes[0].timestamp_s.unwrap_or_default();
        let mut series = CanonicalSeries::with_capacity(fixes.len());
        let mut joined = 0usize;

        for fix in &fixes {
            let timestamp = fix.timestamp_s.unwrap_or(start);
            let tolerance = self.sensor_tolerance_s;

            let hr = fix
                .hr_bpm
                .or_else(|| nearest_field(&sensors, timestamp, tolerance, |s| s.hr_bpm));
            let power = fix
                .power_w
                .or_else(|| nearest_field(&sensors, timestamp, tolerance, |s| s.power_w));
            let cadence = fix
                .cadence
                .or_else(|| nearest_field(&sensors, timestamp, tolerance, |s| s.cadence));

            if (fix.hr_bpm.is_none() && hr.is_some())
                || (fix.power_w.is_none() && power.is_some())
                || (fix.cadence.is_none() && cadence.is_some())
            {
                joined += 1;
            }

            series.time_s.push(timestamp - start);
            series.distance_m.push(0.0);
            series.latitude.push(fix.latitude);
            series.longitude.push(fix.longitude);
            series.reported_distance_m.push(fix.distance_m);
            series.raw_elevation_m.push(fix.elevation_m);
            series.elevation_m.push(None);
            series.speed_mps.push(fix.speed_mps);
            series.pace_s_per_km.push(None);
            series.vam_m_per_h.push(None);
            series.hr_bpm.push(hr);
            series.power_w.push(power);
            series.cadence.push(cadence);
        }

        tracing::debug!(
            points = series.len(),
            samples = sensors.len(),
            joined,
            "Normalized telemetry"
        );

        series
    }
}

impl Default for SeriesNormalizer {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Normalize raw records into a canonical series using `config`.
pub fn normalize(
    points: &[RawRecord],
    samples: &[RawRecord],
    config: &AnalysisConfig,
) -> CanonicalSeries {
    SeriesNormalizer::from_config(config).normalize(points, samples)
}

/// Remove entries without a timestamp, returning how many were removed.
fn drop_untimed<T>(items: &mut Vec<T>, timestamp: impl Fn(&T) -> Option<f64>) -> usize {
    let before = items.len();
    items.retain(|item| timestamp(item).is_some());
    before - items.len()
}

/// Value of `field` from the closest sample carrying it, within `tolerance`.
///
/// On an exact tie the earlier sample wins.
fn nearest_field<F>(samples: &[TimedSample], t: f64, tolerance: f64, field: F) -> Option<f64>
where
    F: Fn(&SensorSample) -> Option<f64>,
{
    let split = samples.partition_point(|s| s.timestamp_s < t);

    let after = samples[split..]
        .iter()
        .take_while(|s| s.timestamp_s - t <= tolerance)
        .find_map(|s| field(&s.sample).map(|v| (s.timestamp_s - t, v)));
    let before = samples[..split]
        .iter()
        .rev()
        .take_while(|s| t - s.timestamp_s <= tolerance)
        .find_map(|s| field(&s.sample).map(|v| (t - s.timestamp_s, v)));

    match (before, after) {
        (Some((gap_before, v_before)), Some((gap_after, v_after))) => {
            Some(if gap_before <= gap_after {
                v_before
            } else {
                v_after
            })
        }
        (before, after) => before.or(after).map(|(_, v)| v),
    }
}

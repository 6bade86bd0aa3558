//! Synthetic telemetry for pipeline tests.

use serde_json::json;
use strideline::{RawRecord, SwimLength, TelemetryBundle};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Start of every synthetic activity, epoch milliseconds.
pub const START_MS: i64 = 1_700_000_000_000;

/// Degrees of latitude per meter (spherical Earth, R = 6371 km).
const DEGREES_PER_METER: f64 = 180.0 / (std::f64::consts::PI * 6_371_000.0);

/// Generator for an outdoor run with a separate heart rate strap.
pub struct MockRun {
    /// Duration in seconds
    pub duration_s: usize,
    /// Constant ground speed
    pub speed_mps: f64,
    /// Climb rate during the first half, descent rate during the second
    pub climb_mps: f64,
    /// Heart rate at the start; rises one bpm every 20 s
    pub base_hr: f64,
}

impl Default for MockRun {
    fn default() -> Self {
        Self {
            duration_s: 1_800,
            speed_mps: 3.0,
            climb_mps: 0.05,
            base_hr: 120.0,
        }
    }
}

impl MockRun {
    /// GPS fixes once per second, heading due north.
    pub fn points(&self) -> Vec<RawRecord> {
        let half = self.duration_s as f64 / 2.0;
        (0..=self.duration_s)
            .map(|i| {
                let t = i as f64;
                let elevation = if t <= half {
                    300.0 + t * self.climb_mps
                } else {
                    300.0 + (2.0 * half - t) * self.climb_mps
                };
                record(json!({
                    "timestamp": START_MS + (i as i64) * 1_000,
                    "lat": 45.0 + t * self.speed_mps * DEGREES_PER_METER,
                    "lng": 7.0,
                    "altitude_m": elevation,
                }))
            })
            .collect()
    }

    /// Heart rate samples every 2 s, offset half a second from the fixes.
    pub fn heart_rate(&self) -> Vec<RawRecord> {
        (0..self.duration_s / 2)
            .map(|k| {
                let t = (k * 2) as f64 + 0.5;
                record(json!({
                    "timestamp": START_MS + (t * 1_000.0) as i64,
                    "heart_rate": (self.base_hr + t / 20.0).round(),
                }))
            })
            .collect()
    }

    pub fn bundle(&self) -> TelemetryBundle {
        TelemetryBundle {
            points: self.points(),
            samples: self.heart_rate(),
            ..Default::default()
        }
    }
}

/// An indoor trainer ride: power and cadence only, no GPS.
pub fn indoor_ride(duration_s: usize, watts: impl Fn(usize) -> f64) -> TelemetryBundle {
    let samples = (0..duration_s)
        .map(|i| {
            record(json!({
                "time": START_MS / 1_000 + i as i64,
                "watts": watts(i),
                "cadence": 90,
            }))
        })
        .collect();
    TelemetryBundle {
        samples,
        ..Default::default()
    }
}

/// Per-length records for a structured pool session in a 25 m pool.
///
/// 200 warm-up, 8 x 100 on a steady pace, 4 x 50 kick, 200 cool-down, with
/// a rest length between blocks.
pub fn structured_swim_lengths() -> Vec<SwimLength> {
    let mut lengths = Vec::new();
    let mut block = |count: usize, seconds: f64, strokes: u32| {
        lengths.extend((0..count).map(|_| SwimLength {
            distance_m: 25.0,
            duration_s: seconds,
            stroke_count: Some(strokes),
            avg_heart_rate: None,
        }));
        lengths.push(SwimLength {
            distance_m: 0.0,
            duration_s: 20.0,
            stroke_count: None,
            avg_heart_rate: None,
        });
    };

    block(8, 30.0, 18);
    for _ in 0..8 {
        block(4, 25.0, 16);
    }
    for _ in 0..4 {
        block(2, 32.0, 0);
    }
    block(8, 31.0, 18);
    lengths
}

pub fn record(value: serde_json::Value) -> RawRecord {
    value.as_object().cloned().unwrap_or_default()
}

//! Field resolution tables for raw telemetry records.
//!
//! Each logical field has an ordered list of candidate keys, each with the
//! unit its value is expressed in. The first candidate that is present,
//! parseable and plausible wins; its value is converted to SI here so no
//! later stage has to know where it came from.

use super::normalizer::normalize_timestamp;
use super::RawRecord;
use chrono::DateTime;
use serde_json::Value;

/// Meters per foot.
pub const METERS_PER_FOOT: f64 = 0.3048;
/// Meters per statute mile.
pub const METERS_PER_MILE: f64 = 1609.344;
/// Degrees per semicircle (FIT position encoding).
const DEGREES_PER_SEMICIRCLE: f64 = 180.0 / 2_147_483_648.0;

/// Record key naming the unit of untyped elevation keys.
pub const ELEVATION_UNIT_KEY: &str = "elevation_unit";

/// Unit a candidate value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUnit {
    /// Seconds or millisecond-epoch, number or RFC 3339 string
    Timestamp,
    Degrees,
    /// FIT semicircles; values within +/-180 are taken as degrees
    Semicircles,
    Meters,
    Feet,
    Kilometers,
    Miles,
    /// Meters unless the record carries an `elevation_unit` tag
    TaggedElevation,
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    /// Already in the target unit (bpm, watts, rpm)
    Native,
}

/// A candidate key for a logical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCandidate {
    pub key: &'static str,
    pub unit: FieldUnit,
}

const fn candidate(key: &'static str, unit: FieldUnit) -> FieldCandidate {
    FieldCandidate { key, unit }
}

/// Ordered candidate table for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Logical field name, for logging
    pub name: &'static str,
    /// Candidates in priority order
    pub candidates: &'static [FieldCandidate],
    /// Plausible SI range, inclusive
    pub valid: (f64, f64),
}

pub const TIMESTAMP: FieldSpec = FieldSpec {
    name: "timestamp",
    candidates: &[
        candidate("timestamp", FieldUnit::Timestamp),
        candidate("time", FieldUnit::Timestamp),
        candidate("time_s", FieldUnit::Timestamp),
        candidate("ts", FieldUnit::Timestamp),
        candidate("t", FieldUnit::Timestamp),
    ],
    valid: (0.0, f64::MAX),
};

pub const LATITUDE: FieldSpec = FieldSpec {
    name: "latitude",
    candidates: &[
        candidate("lat", FieldUnit::Degrees),
        candidate("latitude", FieldUnit::Degrees),
        candidate("latitude_deg", FieldUnit::Degrees),
        candidate("position_lat", FieldUnit::Semicircles),
    ],
    valid: (-90.0, 90.0),
};

pub const LONGITUDE: FieldSpec = FieldSpec {
    name: "longitude",
    candidates: &[
        candidate("lon", FieldUnit::Degrees),
        candidate("lng", FieldUnit::Degrees),
        candidate("longitude", FieldUnit::Degrees),
        candidate("longitude_deg", FieldUnit::Degrees),
        candidate("position_long", FieldUnit::Semicircles),
    ],
    valid: (-180.0, 180.0),
};

pub const ELEVATION: FieldSpec = FieldSpec {
    name: "elevation",
    candidates: &[
        candidate("elevation_m", FieldUnit::Meters),
        candidate("altitude_m", FieldUnit::Meters),
        candidate("enhanced_altitude", FieldUnit::Meters),
        candidate("elevation_ft", FieldUnit::Feet),
        candidate("altitude_ft", FieldUnit::Feet),
        candidate("elevation", FieldUnit::TaggedElevation),
        candidate("altitude", FieldUnit::TaggedElevation),
        candidate("ele", FieldUnit::TaggedElevation),
    ],
    valid: (-500.0, 9000.0),
};

pub const DISTANCE: FieldSpec = FieldSpec {
    name: "distance",
    candidates: &[
        candidate("distance_m", FieldUnit::Meters),
        candidate("distance", FieldUnit::Meters),
        candidate("dist", FieldUnit::Meters),
        candidate("distance_km", FieldUnit::Kilometers),
        candidate("distance_mi", FieldUnit::Miles),
    ],
    valid: (0.0, 2_000_000.0),
};

pub const SPEED: FieldSpec = FieldSpec {
    name: "speed",
    candidates: &[
        candidate("speed_mps", FieldUnit::MetersPerSecond),
        candidate("enhanced_speed", FieldUnit::MetersPerSecond),
        candidate("speed", FieldUnit::MetersPerSecond),
        candidate("velocity_smooth", FieldUnit::MetersPerSecond),
        candidate("speed_kmh", FieldUnit::KilometersPerHour),
        candidate("speed_mph", FieldUnit::MilesPerHour),
    ],
    valid: (0.0, 100.0),
};

pub const HEART_RATE: FieldSpec = FieldSpec {
    name: "heart_rate",
    candidates: &[
        candidate("hr_bpm", FieldUnit::Native),
        candidate("heart_rate", FieldUnit::Native),
        candidate("heartrate", FieldUnit::Native),
        candidate("hr", FieldUnit::Native),
        candidate("bpm", FieldUnit::Native),
    ],
    valid: (20.0, 250.0),
};

pub const CADENCE: FieldSpec = FieldSpec {
    name: "cadence",
    candidates: &[
        candidate("cadence", FieldUnit::Native),
        candidate("cadence_rpm", FieldUnit::Native),
        candidate("cad", FieldUnit::Native),
        candidate("rpm", FieldUnit::Native),
    ],
    valid: (0.0, 300.0),
};

pub const POWER: FieldSpec = FieldSpec {
    name: "power",
    candidates: &[
        candidate("power_w", FieldUnit::Native),
        candidate("power", FieldUnit::Native),
        candidate("watts", FieldUnit::Native),
    ],
    valid: (0.0, 3000.0),
};

impl FieldSpec {
    /// Resolve this field from a record, in SI units.
    ///
    /// Returns `None` when no candidate yields a plausible value.
    pub fn resolve(&self, record: &RawRecord) -> Option<f64> {
        self.candidates.iter().find_map(|candidate| {
            let value = record.get(candidate.key)?;
            let si = convert(record, value, candidate.unit)?;
            (si.is_finite() && si >= self.valid.0 && si <= self.valid.1).then_some(si)
        })
    }
}

/// Convert one candidate value to SI.
fn convert(record: &RawRecord, value: &Value, unit: FieldUnit) -> Option<f64> {
    let raw = match unit {
        FieldUnit::Timestamp => return timestamp_value(value),
        _ => numeric_value(value)?,
    };
    let si = match unit {
        FieldUnit::Timestamp
        | FieldUnit::Degrees
        | FieldUnit::Meters
        | FieldUnit::MetersPerSecond
        | FieldUnit::Native => raw,
        FieldUnit::Semicircles => {
            if raw.abs() <= 180.0 {
                raw
            } else {
                raw * DEGREES_PER_SEMICIRCLE
            }
        }
        FieldUnit::Feet => raw * METERS_PER_FOOT,
        FieldUnit::Kilometers => raw * 1000.0,
        FieldUnit::Miles => raw * METERS_PER_MILE,
        FieldUnit::TaggedElevation => raw * elevation_scale(record)?,
        FieldUnit::KilometersPerHour => raw / 3.6,
        FieldUnit::MilesPerHour => raw * METERS_PER_MILE / 3600.0,
    };
    Some(si)
}

/// Meters per elevation unit according to the record's unit tag.
fn elevation_scale(record: &RawRecord) -> Option<f64> {
    let Some(tag) = record.get(ELEVATION_UNIT_KEY) else {
        return Some(1.0);
    };
    match tag.as_str()?.trim().to_ascii_lowercase().as_str() {
        "m" | "meter" | "meters" | "metre" | "metres" => Some(1.0),
        "ft" | "foot" | "feet" => Some(METERS_PER_FOOT),
        _ => None,
    }
}

/// Read a JSON number or numeric string.
pub fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Read a timestamp as seconds: numbers (with the millisecond heuristic) or
/// RFC 3339 strings.
fn timestamp_value(value: &Value) -> Option<f64> {
    if let Some(number) = numeric_value(value) {
        return Some(normalize_timestamp(number));
    }
    let text = value.as_str()?;
    let parsed = DateTime::parse_from_rfc3339(text.trim()).ok()?;
    Some(parsed.timestamp_millis() as f64 / 1000.0)
}

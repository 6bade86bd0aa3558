//! Grade-adjusted pace over a whole activity.
//!
//! The correction is expressed per 100 ft of elevation per mile: climbing
//! adds 1.2 min/mi. A net descent passed as a negative value takes off
//! 0.8 min/mi.

use crate::series::fields::{METERS_PER_FOOT, METERS_PER_MILE};

/// Minutes per mile added per 100 ft/mi of climb.
pub const UPHILL_COEFFICIENT: f64 = 1.2;
/// Minutes per mile removed per 100 ft/mi of net descent.
pub const DOWNHILL_COEFFICIENT: f64 = 0.8;

/// Grade-adjusted pace in seconds per kilometer.
///
/// `elevation_gain_m` is the total climb over the activity. Descending on
/// the way back does not cancel it, so a loop course keeps its uphill
/// correction. Returns `None` when any input is missing, distance or
/// duration is not positive, or the adjusted pace would not be positive.
pub fn grade_adjusted_pace(
    distance_m: Option<f64>,
    duration_s: Option<f64>,
    elevation_gain_m: Option<f64>,
) -> Option<f64> {
    let distance_m = distance_m.filter(|d| *d > 0.0)?;
    let duration_s = duration_s.filter(|d| *d > 0.0)?;
    let elevation_gain_m = elevation_gain_m.filter(|e| e.is_finite())?;

    let miles = distance_m / METERS_PER_MILE;
    let pace_min_per_mile = (duration_s / 60.0) / miles;
    let feet_per_mile = (elevation_gain_m / METERS_PER_FOOT) / miles;

    let coefficient = if feet_per_mile >= 0.0 {
        UPHILL_COEFFICIENT
    } else {
        DOWNHILL_COEFFICIENT
    };
    let adjusted = pace_min_per_mile + (feet_per_mile / 100.0) * coefficient;
    if adjusted <= 0.0 {
        return None;
    }

    Some(min_per_mile_to_s_per_km(adjusted))
}

/// Convert minutes per mile to seconds per kilometer.
pub fn min_per_mile_to_s_per_km(min_per_mile: f64) -> f64 {
    min_per_mile * 60.0 * 1000.0 / METERS_PER_MILE
}

/// Convert seconds per kilometer to minutes per mile.
pub fn s_per_km_to_min_per_mile(s_per_km: f64) -> f64 {
    s_per_km * METERS_PER_MILE / 1000.0 / 60.0
}

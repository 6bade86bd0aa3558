//! Display formatting for derived metrics.
//!
//! Every function takes the unit system as an argument. Missing values
//! render as `--`.

use crate::config::Units;
use crate::series::fields::{METERS_PER_FOOT, METERS_PER_MILE};

/// Meters per yard.
pub const METERS_PER_YARD: f64 = 0.9144;

/// Placeholder for a missing value.
pub const MISSING: &str = "--";

/// Format seconds as `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a pace given in seconds per kilometer as `/km` or `/mi`.
pub fn format_pace(s_per_km: Option<f64>, units: Units) -> String {
    match s_per_km.filter(|p| p.is_finite() && *p > 0.0) {
        Some(pace) => match units {
            Units::Metric => format!("{} /km", format_duration(pace)),
            Units::Imperial => format!(
                "{} /mi",
                format_duration(pace * METERS_PER_MILE / 1000.0)
            ),
        },
        None => MISSING.to_string(),
    }
}

/// Format a swim pace given in seconds per 100 m as `/100m` or `/100yd`.
pub fn format_swim_pace(s_per_100m: Option<f64>, units: Units) -> String {
    match s_per_100m.filter(|p| p.is_finite() && *p > 0.0) {
        Some(pace) => match units {
            Units::Metric => format!("{}/100m", format_duration(pace)),
            Units::Imperial => format!("{}/100yd", format_duration(pace * METERS_PER_YARD)),
        },
        None => MISSING.to_string(),
    }
}

/// Format a pace spread given in seconds per 100 m as `±s.s` per 100 m or
/// per 100 yd.
pub fn format_swim_spread(s_per_100m: f64, units: Units) -> String {
    let spread = match units {
        Units::Metric => s_per_100m,
        Units::Imperial => s_per_100m * METERS_PER_YARD,
    };
    format!("±{:.1}s", spread)
}

/// Format a distance: km/mi for long distances, m/yd for short ones.
pub fn format_distance(meters: Option<f64>, units: Units) -> String {
    let Some(meters) = meters.filter(|m| m.is_finite()) else {
        return MISSING.to_string();
    };
    match units {
        Units::Metric if meters >= 1000.0 => format!("{:.2} km", meters / 1000.0),
        Units::Metric => format!("{:.0} m", meters),
        Units::Imperial if meters >= METERS_PER_MILE => {
            format!("{:.2} mi", meters / METERS_PER_MILE)
        }
        Units::Imperial => format!("{:.0} yd", meters / METERS_PER_YARD),
    }
}

/// Format a pool distance in meters or yards, never switching to km/mi.
pub fn format_swim_distance(meters: f64, units: Units) -> String {
    match units {
        Units::Metric => format!("{:.0} m", meters),
        Units::Imperial => format!("{:.0} yd", meters / METERS_PER_YARD),
    }
}

/// Format an elevation in meters or feet.
pub fn format_elevation(meters: Option<f64>, units: Units) -> String {
    match meters.filter(|m| m.is_finite()) {
        Some(m) => match units {
            Units::Metric => format!("{:.0} m", m),
            Units::Imperial => format!("{:.0} ft", m / METERS_PER_FOOT),
        },
        None => MISSING.to_string(),
    }
}

/// Format a vertical ascent rate given in meters per hour.
pub fn format_vam(m_per_h: Option<f64>, units: Units) -> String {
    match m_per_h.filter(|v| v.is_finite()) {
        Some(v) => match units {
            Units::Metric => format!("{:.0} m/h", v),
            Units::Imperial => format!("{:.0} ft/h", v / METERS_PER_FOOT),
        },
        None => MISSING.to_string(),
    }
}

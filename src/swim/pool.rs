//! Pool length resolution.

use crate::config::SwimSettings;
use crate::format::METERS_PER_YARD;
use serde::{Deserialize, Serialize};

/// Unit the pool is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolUnit {
    Meters,
    Yards,
}

impl PoolUnit {
    /// Length of one unit in meters.
    pub fn meters(&self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Yards => METERS_PER_YARD,
        }
    }

    /// Short unit label.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Yards => "yd",
        }
    }
}

/// Which source the pool length came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolLengthSource {
    /// Set explicitly on the activity
    Override,
    /// Target pool length of the training plan
    TrainingPlan,
    /// Stored user preference
    UserPreference,
    /// Total distance divided by length count
    Inferred,
    /// Global default
    Default,
}

/// Everything known about the pool length, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolLengthHints {
    /// Per-activity override
    pub override_m: Option<f64>,
    /// Training plan target pool length
    pub plan_target_m: Option<f64>,
    /// User's stored preference
    pub user_preference_m: Option<f64>,
    /// Total swum distance
    pub total_distance_m: Option<f64>,
    /// Number of lengths swum
    pub length_count: Option<usize>,
}

/// A resolved pool length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPool {
    /// Pool length in meters
    pub length_m: f64,
    /// Where the length came from
    pub source: PoolLengthSource,
    /// Meters or yards
    pub unit: PoolUnit,
}

/// Resolve the pool length from `hints`.
///
/// Sources are tried in order: override, plan target, user preference,
/// inference from distance and length count, then the configured default.
/// The first positive value wins and later sources are never consulted.
pub fn resolve_pool_length(hints: &PoolLengthHints, settings: &SwimSettings) -> ResolvedPool {
    let inferred = match (hints.total_distance_m, hints.length_count) {
        (Some(distance), Some(count)) if count > 0 => Some(distance / count as f64),
        _ => None,
    };

    let candidates = [
        (hints.override_m, PoolLengthSource::Override),
        (hints.plan_target_m, PoolLengthSource::TrainingPlan),
        (hints.user_preference_m, PoolLengthSource::UserPreference),
        (inferred, PoolLengthSource::Inferred),
    ];

    let (length_m, source) = candidates
        .into_iter()
        .find_map(|(value, source)| {
            value
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| (v, source))
        })
        .unwrap_or((settings.default_pool_length_m, PoolLengthSource::Default));

    let unit = pool_unit(length_m, settings);
    tracing::debug!(length_m, ?source, ?unit, "Resolved pool length");

    ResolvedPool {
        length_m,
        source,
        unit,
    }
}

/// Yard pools are recognized by their length in yards (20 to 26 by default).
pub fn pool_unit(length_m: f64, settings: &SwimSettings) -> PoolUnit {
    let length_yd = length_m / PoolUnit::Yards.meters();
    if length_yd >= settings.yard_pool_min_yd && length_yd <= settings.yard_pool_max_yd {
        PoolUnit::Yards
    } else {
        PoolUnit::Meters
    }
}

//! Time-in-zone classification.

use super::error::{AnalyticsError, AnalyticsResult};
use super::zones::ZoneDefinition;
use crate::config::ZoneWeighting;
use serde::{Deserialize, Serialize};

/// Time spent in one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBin {
    /// Zero-based zone index
    pub zone_index: usize,
    /// Zone name
    pub name: String,
    /// Seconds spent in the zone
    pub duration_s: f64,
    /// Share of all classified time, 0-100
    pub percent: f64,
    /// Lower edge of the zone
    pub range_min: f64,
    /// Upper edge of the zone, or the nominal ceiling for the top zone
    pub range_max: Option<f64>,
}

/// Zone tables per discipline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneBins {
    /// Heart rate zones, when a heart rate definition was supplied
    pub heart_rate: Option<Vec<ZoneBin>>,
    /// Power zones, when a power definition was supplied
    pub power: Option<Vec<ZoneBin>>,
}

/// Classify a per-sample series into zones.
///
/// Every zone gets a bin, including empty ones. `None`, negative and
/// non-finite values are skipped. With [`ZoneWeighting::PerSample`] each
/// classified sample counts one second; with [`ZoneWeighting::Elapsed`] it
/// counts the time until the next sample (the last sample counts zero).
pub fn classify_series(
    definition: &ZoneDefinition,
    values: &[Option<f64>],
    time_s: &[f64],
    weighting: ZoneWeighting,
) -> AnalyticsResult<Vec<ZoneBin>> {
    if weighting == ZoneWeighting::Elapsed && time_s.len() != values.len() {
        return Err(AnalyticsError::MismatchedLengths {
            column: "zone values",
            expected: time_s.len(),
            actual: values.len(),
        });
    }

    let mut durations = vec![0.0; definition.len()];
    let mut skipped = 0usize;

    for (i, value) in values.iter().enumerate() {
        let Some(zone) = value.and_then(|v| definition.zone_index(v)) else {
            skipped += 1;
            continue;
        };
        let weight = match weighting {
            ZoneWeighting::PerSample => 1.0,
            ZoneWeighting::Elapsed => time_s
                .get(i + 1)
                .map_or(0.0, |next| (next - time_s[i]).max(0.0)),
        };
        durations[zone] += weight;
    }

    tracing::debug!(
        zones = definition.len(),
        classified = values.len() - skipped,
        skipped,
        "Classified samples into zones"
    );

    Ok(build_bins(definition, &durations))
}

/// Build bins from precomputed per-zone durations.
///
/// A shorter vector leaves the trailing zones at zero; a longer one does not
/// fit the definition and is rejected.
pub fn bins_from_durations(
    definition: &ZoneDefinition,
    durations_s: &[f64],
) -> AnalyticsResult<Vec<ZoneBin>> {
    if durations_s.len() > definition.len() {
        return Err(AnalyticsError::MismatchedLengths {
            column: "zone durations",
            expected: definition.len(),
            actual: durations_s.len(),
        });
    }

    let mut durations = vec![0.0; definition.len()];
    for (slot, &value) in durations.iter_mut().zip(durations_s) {
        *slot = if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        };
    }
    Ok(build_bins(definition, &durations))
}

fn build_bins(definition: &ZoneDefinition, durations: &[f64]) -> Vec<ZoneBin> {
    let total: f64 = durations.iter().sum();
    let last = definition.len().saturating_sub(1);

    definition
        .bands()
        .iter()
        .zip(durations)
        .enumerate()
        .map(|(zone_index, (band, &duration_s))| ZoneBin {
            zone_index,
            name: band.name.clone(),
            duration_s,
            percent: if total > 0.0 {
                duration_s / total * 100.0
            } else {
                0.0
            },
            range_min: band.lower_bound,
            range_max: match band.upper_bound {
                Some(upper) => Some(upper),
                None if zone_index == last => definition.ceiling(),
                None => None,
            },
        })
        .collect()
}

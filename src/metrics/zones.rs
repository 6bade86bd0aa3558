//! Heart rate and power zone definitions.
//!
//! A [`ZoneDefinition`] is an ordered list of bands covering `[0, inf)`.
//! Definitions are either supplied explicitly or derived from a maximum
//! (estimated or known heart rate, or FTP) and a banding scheme.

use super::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};

/// One band of a zone definition, `lower_bound <= v < upper_bound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBand {
    /// Zone name
    pub name: String,
    /// Inclusive lower bound (bpm or watts)
    pub lower_bound: f64,
    /// Exclusive upper bound; `None` for the open-ended top zone
    pub upper_bound: Option<f64>,
}

/// Ordered zone bands covering `[0, inf)` without gaps or overlaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    bands: Vec<ZoneBand>,
    /// Nominal top of the scale (max HR or the top band edge), used as the
    /// display maximum of the open-ended zone
    ceiling: Option<f64>,
}

impl ZoneDefinition {
    /// Build a definition from explicit bands, checking coverage.
    pub fn new(bands: Vec<ZoneBand>) -> AnalyticsResult<Self> {
        Self::with_ceiling(bands, None)
    }

    /// Build a definition with a nominal display ceiling.
    pub fn with_ceiling(bands: Vec<ZoneBand>, ceiling: Option<f64>) -> AnalyticsResult<Self> {
        validate_bands(&bands)?;
        Ok(Self { bands, ceiling })
    }

    /// Build a definition from the upper edges of every zone but the last.
    ///
    /// `edges` must be strictly increasing and positive; zone 1 starts at 0
    /// and the last zone is open-ended.
    pub fn from_edges(
        names: &[&str],
        edges: &[f64],
        ceiling: Option<f64>,
    ) -> AnalyticsResult<Self> {
        if names.len() != edges.len() + 1 {
            return Err(AnalyticsError::InvalidZones(format!(
                "{} names for {} edges",
                names.len(),
                edges.len()
            )));
        }

        let mut lower = 0.0;
        let mut bands = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let upper = edges.get(i).copied();
            bands.push(ZoneBand {
                name: (*name).to_string(),
                lower_bound: lower,
                upper_bound: upper,
            });
            if let Some(upper) = upper {
                lower = upper;
            }
        }
        Self::with_ceiling(bands, ceiling)
    }

    /// Bands in order.
    pub fn bands(&self) -> &[ZoneBand] {
        &self.bands
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Check if the definition has no zones (never true once validated).
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Nominal display ceiling.
    pub fn ceiling(&self) -> Option<f64> {
        self.ceiling
    }

    /// Index of the zone containing `value`, if any.
    ///
    /// Lower bounds are inclusive and upper bounds exclusive. Negative and
    /// non-finite values are not classified.
    pub fn zone_index(&self, value: f64) -> Option<usize> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        self.bands.iter().position(|band| {
            value >= band.lower_bound && band.upper_bound.map_or(true, |upper| value < upper)
        })
    }
}

/// Check that bands start at zero, abut exactly and end open.
fn validate_bands(bands: &[ZoneBand]) -> AnalyticsResult<()> {
    let Some(first) = bands.first() else {
        return Err(AnalyticsError::InvalidZones("no zones defined".to_string()));
    };
    if first.lower_bound != 0.0 {
        return Err(AnalyticsError::InvalidZones(format!(
            "first zone starts at {} instead of 0",
            first.lower_bound
        )));
    }

    for (i, band) in bands.iter().enumerate() {
        let is_last = i + 1 == bands.len();
        match (band.upper_bound, is_last) {
            (None, true) => {}
            (None, false) => {
                return Err(AnalyticsError::InvalidZones(format!(
                    "zone {} is open-ended but is not the last zone",
                    i + 1
                )));
            }
            (Some(_), true) => {
                return Err(AnalyticsError::InvalidZones(
                    "last zone must be open-ended".to_string(),
                ));
            }
            (Some(upper), false) => {
                if !(upper > band.lower_bound) {
                    return Err(AnalyticsError::InvalidZones(format!(
                        "zone {} is empty or inverted ({}..{})",
                        i + 1,
                        band.lower_bound,
                        upper
                    )));
                }
                let next_lower = bands[i + 1].lower_bound;
                if next_lower != upper {
                    let kind = if next_lower > upper { "gap" } else { "overlap" };
                    return Err(AnalyticsError::InvalidZones(format!(
                        "{} between zone {} and {} ({} vs {})",
                        kind,
                        i + 1,
                        i + 2,
                        upper,
                        next_lower
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Biological sex, used only to select a max HR formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Maximum heart rate estimation formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxHrFormula {
    /// 208 - 0.7 x age
    #[default]
    Tanaka,
    /// 220 - age
    Fox,
    /// 206 - 0.88 x age, for women; falls back to Tanaka for men
    Gulati,
}

impl MaxHrFormula {
    /// Estimate maximum heart rate from age.
    pub fn estimate(&self, age: u32, sex: Option<Sex>) -> AnalyticsResult<f64> {
        if age == 0 || age > 120 {
            return Err(AnalyticsError::InvalidInput(format!(
                "Age must be between 1 and 120 years, got {}",
                age
            )));
        }

        let age = f64::from(age);
        let max_hr = match self {
            Self::Tanaka => 0.7f64.mul_add(-age, 208.0),
            Self::Fox => 220.0 - age,
            Self::Gulati if sex == Some(Sex::Male) => 0.7f64.mul_add(-age, 208.0),
            Self::Gulati => 0.88f64.mul_add(-age, 206.0),
        };
        Ok(max_hr)
    }

    /// The formula as text.
    pub const fn formula(&self) -> &'static str {
        match self {
            Self::Tanaka => "208 - 0.7 x age",
            Self::Fox => "220 - age",
            Self::Gulati => "206 - 0.88 x age",
        }
    }
}

/// Banding scheme for heart rate zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPreset {
    /// 50/60/70/80/90/100 % of max
    #[default]
    Classic,
    /// 60/70/80/87/93/100 % of max, tighter at the top for running
    Running,
}

impl BandPreset {
    /// Band edges as fractions; six edges delimit five zones.
    pub const fn edges(&self) -> [f64; 6] {
        match self {
            Self::Classic => [0.50, 0.60, 0.70, 0.80, 0.90, 1.00],
            Self::Running => [0.60, 0.70, 0.80, 0.87, 0.93, 1.00],
        }
    }

    /// Zone names for this preset.
    pub const fn names(&self) -> [&'static str; 5] {
        match self {
            Self::Classic => ["Recovery", "Aerobic", "Tempo", "Threshold", "Maximum"],
            Self::Running => ["Easy", "Aerobic", "Tempo", "Threshold", "Anaerobic"],
        }
    }
}

/// Inputs for estimating heart rate zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateProfile {
    /// Age in years
    pub age: u32,
    /// Sex, for the Gulati formula
    #[serde(default)]
    pub sex: Option<Sex>,
    /// Known maximum heart rate; replaces the age estimate
    #[serde(default)]
    pub max_hr: Option<f64>,
    /// Resting heart rate, required for reserve mode
    #[serde(default)]
    pub resting_hr: Option<f64>,
    /// Max HR formula
    #[serde(default)]
    pub formula: MaxHrFormula,
    /// Banding scheme
    #[serde(default)]
    pub preset: BandPreset,
    /// Compute bands against heart rate reserve (Karvonen)
    #[serde(default)]
    pub reserve: bool,
}

impl HeartRateProfile {
    /// Profile for an athlete of the given age with default formula and bands.
    pub fn from_age(age: u32) -> Self {
        Self {
            age,
            sex: None,
            max_hr: None,
            resting_hr: None,
            formula: MaxHrFormula::default(),
            preset: BandPreset::default(),
            reserve: false,
        }
    }

    /// Maximum heart rate: the supplied value, or the formula estimate.
    pub fn max_hr(&self) -> AnalyticsResult<f64> {
        match self.max_hr {
            Some(max) if max > 0.0 => Ok(max),
            Some(max) => Err(AnalyticsError::InvalidInput(format!(
                "Max HR must be positive, got {}",
                max
            ))),
            None => self.formula.estimate(self.age, self.sex),
        }
    }

    /// Derive the zone definition.
    ///
    /// Without reserve mode a band edge is `fraction x max`. In reserve mode
    /// it is `rest + fraction x (max - rest)`; reserve mode without a resting
    /// heart rate falls back to percent of max.
    pub fn zones(&self) -> AnalyticsResult<ZoneDefinition> {
        let max_hr = self.max_hr()?;

        let reserve_rest = match (self.reserve, self.resting_hr) {
            (true, Some(rest)) if rest >= max_hr || rest <= 0.0 => {
                return Err(AnalyticsError::InvalidInput(format!(
                    "Resting HR {} must be positive and below max HR {}",
                    rest, max_hr
                )));
            }
            (true, Some(rest)) => Some(rest),
            (true, None) => {
                tracing::warn!("Reserve zones requested without resting HR, using percent of max");
                None
            }
            (false, _) => None,
        };

        let bound = |fraction: f64| match reserve_rest {
            Some(rest) => fraction.mul_add(max_hr - rest, rest),
            None => fraction * max_hr,
        };

        let edges = self.preset.edges();
        // The 50%/60% bottom edge and the 100% top edge are nominal: zone 1
        // reaches down to 0 and zone 5 is open-ended.
        let inner: Vec<f64> = edges[1..5].iter().map(|&f| bound(f)).collect();
        ZoneDefinition::from_edges(&self.preset.names(), &inner, Some(bound(edges[5])))
    }
}

/// Coggan power zone upper edges as fractions of FTP.
pub const COGGAN_EDGES: [f64; 6] = [0.55, 0.75, 0.90, 1.05, 1.20, 1.50];

/// Coggan power zone names.
pub const COGGAN_NAMES: [&str; 7] = [
    "Active Recovery",
    "Endurance",
    "Tempo",
    "Threshold",
    "VO2max",
    "Anaerobic",
    "Neuromuscular",
];

/// Coggan 7-zone power definition from FTP.
pub fn power_zones_from_ftp(ftp: f64) -> AnalyticsResult<ZoneDefinition> {
    if !ftp.is_finite() || ftp <= 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "FTP must be positive, got {}",
            ftp
        )));
    }
    let edges: Vec<f64> = COGGAN_EDGES.iter().map(|f| f * ftp).collect();
    ZoneDefinition::from_edges(&COGGAN_NAMES, &edges, None)
}

/// Where a zone definition comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneSource {
    /// Caller-supplied bands
    Explicit { bands: Vec<ZoneBand> },
    /// Estimated heart rate zones
    HeartRate(HeartRateProfile),
    /// Power zones from functional threshold power
    Ftp { ftp: f64 },
}

impl ZoneSource {
    /// Resolve the source into a validated definition.
    pub fn definition(&self) -> AnalyticsResult<ZoneDefinition> {
        match self {
            Self::Explicit { bands } => ZoneDefinition::new(bands.clone()),
            Self::HeartRate(profile) => profile.zones(),
            Self::Ftp { ftp } => power_zones_from_ftp(*ftp),
        }
    }
}

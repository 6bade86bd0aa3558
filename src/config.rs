//! Analysis configuration and display preferences.
//!
//! Every tunable the pipeline uses lives here with its default. Configuration
//! is loaded from TOML; missing keys fall back to the defaults below.

use crate::metrics::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unit system preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Metric units (km, m, min/km)
    #[default]
    Metric,
    /// Imperial units (mi, ft, min/mi)
    Imperial,
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Units::Metric => write!(f, "Metric"),
            Units::Imperial => write!(f, "Imperial"),
        }
    }
}

/// How classified samples are converted into time-in-zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneWeighting {
    /// Every classified sample counts as one second.
    #[default]
    PerSample,
    /// Each sample is weighted by the time until the next sample.
    Elapsed,
}

/// Top-level analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Elevation smoothing settings
    pub smoothing: SmoothingSettings,
    /// Trailing window widths
    pub windows: WindowSettings,
    /// Sensor stream join settings
    pub join: JoinSettings,
    /// Plausible speed range for pace derivation
    pub speed_bounds: SpeedBounds,
    /// Pool swim settings
    pub swim: SwimSettings,
    /// Zone classification settings
    pub zones: ZoneSettings,
}

impl AnalysisConfig {
    /// Config tuned for cycling: same windows, wider speed range.
    pub fn cycling() -> Self {
        Self {
            speed_bounds: SpeedBounds::cycling(),
            ..Default::default()
        }
    }

    /// Reject values that would make the pipeline meaningless.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let alpha = self.smoothing.elevation_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(AnalyticsError::InvalidInput(format!(
                "elevation_alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        if !(self.windows.pace_window_s > 0.0) || !(self.windows.vam_window_s > 0.0) {
            return Err(AnalyticsError::InvalidInput(
                "window widths must be positive".to_string(),
            ));
        }
        if !(self.join.sensor_tolerance_s >= 0.0) {
            return Err(AnalyticsError::InvalidInput(
                "sensor_tolerance_s must not be negative".to_string(),
            ));
        }
        let bounds = &self.speed_bounds;
        if !(bounds.min_kmh >= 0.0 && bounds.max_kmh > bounds.min_kmh) {
            return Err(AnalyticsError::InvalidInput(format!(
                "speed bounds {}..{} km/h are not a valid range",
                bounds.min_kmh, bounds.max_kmh
            )));
        }
        if !(self.swim.default_pool_length_m > 0.0)
            || !(self.swim.bucket_units > 0.0)
            || !(self.swim.split_units > 0.0)
        {
            return Err(AnalyticsError::InvalidInput(
                "swim lengths must be positive".to_string(),
            ));
        }
        if self.swim.min_main_repeats == 0 {
            return Err(AnalyticsError::InvalidInput(
                "min_main_repeats must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Elevation smoothing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingSettings {
    /// EMA smoothing factor applied to elevation (0 < alpha <= 1)
    pub elevation_alpha: f64,
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        Self {
            elevation_alpha: 0.2,
        }
    }
}

/// Trailing window widths used by the derivation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Window for pace in seconds
    pub pace_window_s: f64,
    /// Window for VAM in seconds
    pub vam_window_s: f64,
    /// VAM below this many meters per hour is reported as no data
    pub vam_noise_floor_m_per_h: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            pace_window_s: 12.0,
            vam_window_s: 30.0,
            vam_noise_floor_m_per_h: 5.0,
        }
    }
}

/// Sensor stream join settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinSettings {
    /// Maximum distance in time between a GPS fix and a joined sensor sample
    pub sensor_tolerance_s: f64,
}

impl Default for JoinSettings {
    fn default() -> Self {
        Self {
            sensor_tolerance_s: 15.0,
        }
    }
}

/// Physiologically plausible speed range. Pace outside it is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedBounds {
    /// Minimum speed in km/h
    pub min_kmh: f64,
    /// Maximum speed in km/h
    pub max_kmh: f64,
}

impl SpeedBounds {
    /// Bounds for running and walking.
    pub const fn foot() -> Self {
        Self {
            min_kmh: 2.0,
            max_kmh: 25.0,
        }
    }

    /// Bounds for road and gravel riding.
    pub const fn cycling() -> Self {
        Self {
            min_kmh: 3.0,
            max_kmh: 100.0,
        }
    }

    /// Check a speed given in meters per second.
    pub fn contains_mps(&self, speed_mps: f64) -> bool {
        let kmh = speed_mps * 3.6;
        kmh >= self.min_kmh && kmh <= self.max_kmh
    }
}

impl Default for SpeedBounds {
    fn default() -> Self {
        Self::foot()
    }
}

/// Pool swim settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimSettings {
    /// Pool length used when nothing else is known
    pub default_pool_length_m: f64,
    /// Lap distances are rounded to this increment (pool units) for bucketing
    pub bucket_units: f64,
    /// Relative tolerance for a lap to count toward the main set
    pub tolerance_fraction: f64,
    /// Minimum absolute tolerance in pool units
    pub min_tolerance_units: f64,
    /// Minimum number of repeats for a main set
    pub min_main_repeats: usize,
    /// Split distance in pool units
    pub split_units: f64,
    /// Pool lengths in this range (yards) are treated as yard pools
    pub yard_pool_min_yd: f64,
    /// Upper end of the yard pool range (yards)
    pub yard_pool_max_yd: f64,
}

impl Default for SwimSettings {
    fn default() -> Self {
        Self {
            default_pool_length_m: 25.0,
            bucket_units: 25.0,
            tolerance_fraction: 0.05,
            min_tolerance_units: 10.0,
            min_main_repeats: 3,
            split_units: 100.0,
            yard_pool_min_yd: 20.0,
            yard_pool_max_yd: 26.0,
        }
    }
}

/// Zone classification settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    /// How classified samples become durations
    pub weighting: ZoneWeighting,
}

/// Get the platform data directory for strideline.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "strideline", "Strideline")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn default_config_path() -> PathBuf {
    get_data_dir().join("analysis.toml")
}

/// Load analysis configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: AnalysisConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    tracing::debug!(path = %path.display(), "Loaded analysis config");
    Ok(config)
}

/// Load configuration from the default path, or defaults if no file exists.
pub fn load_default_config() -> Result<AnalysisConfig, ConfigError> {
    let path = default_config_path();
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }
    load_config(&path)
}

/// Save analysis configuration to a TOML file.
pub fn save_config(path: &Path, config: &AnalysisConfig) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

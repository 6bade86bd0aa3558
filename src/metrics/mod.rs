//! Metric derivation, smoothing and training zones.

pub mod classifier;
pub mod derivation;
pub mod error;
pub mod gap;
pub mod smoothing;
pub mod window;
pub mod zones;

pub use classifier::{bins_from_durations, classify_series, ZoneBin, ZoneBins};
pub use derivation::{windowed_pace, windowed_vam, MetricDeriver};
pub use error::{AnalyticsError, AnalyticsResult};
pub use gap::grade_adjusted_pace;
pub use smoothing::{smooth_trace, EmaSmoother};
pub use window::{trailing_map, TrailingWindow, WindowSpan};
pub use zones::{
    power_zones_from_ftp, BandPreset, HeartRateProfile, MaxHrFormula, Sex, ZoneBand,
    ZoneDefinition, ZoneSource,
};

//! Strideline - Endurance Telemetry Analytics
//!
//! Turns raw activity telemetry (GPS fixes, sensor samples, pool swim
//! lengths and laps) into a canonical time series with derived pace,
//! elevation and VAM, heart rate and power zone distributions, and swim set
//! tables.

pub mod analyzer;
pub mod config;
pub mod format;
pub mod metrics;
pub mod series;
pub mod swim;

// Re-export commonly used types
pub use analyzer::{
    analyze, ActivityAnalysis, ActivityAnalyzer, ActivitySummary, AnalysisRequest,
    AnalysisSeries, ZoneRequest,
};
pub use config::{AnalysisConfig, Units};
pub use metrics::error::{AnalyticsError, AnalyticsResult};
pub use series::{CanonicalSeries, RawRecord, TelemetryBundle};
pub use swim::{SwimLength, SwimSets};

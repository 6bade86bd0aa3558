//! Activity analysis pipeline.
//!
//! Stages run in order: normalize, resolve distance and elevation, derive
//! windowed metrics, summarize. Zone classification and swim analysis read
//! disjoint inputs and run in parallel. Downsampling comes last so every
//! derived value is computed at full resolution.

use crate::config::{AnalysisConfig, Units};
use crate::metrics::classifier::{classify_series, ZoneBins};
use crate::metrics::derivation::MetricDeriver;
use crate::metrics::error::AnalyticsResult;
use crate::metrics::gap::grade_adjusted_pace;
use crate::metrics::zones::ZoneSource;
use crate::series::{
    downsample, CanonicalSeries, DistanceSource, ElevationResolver, SeriesNormalizer,
    TelemetryBundle,
};
use crate::swim::{PoolLengthHints, SwimAnalyzer, SwimSets};
use serde::{Deserialize, Serialize};

/// Zone definitions to classify against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneRequest {
    pub heart_rate: Option<ZoneSource>,
    pub power: Option<ZoneSource>,
}

/// Per-invocation display preferences and hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRequest {
    pub zones: ZoneRequest,
    /// Unit system for swim summary lines
    pub units: Units,
    pub pool: PoolLengthHints,
    /// Maximum number of samples in the returned series
    pub point_budget: Option<usize>,
}

/// The canonical series with its derived columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSeries {
    pub series: CanonicalSeries,
    /// Whole-activity grade-adjusted pace, seconds per kilometer
    pub grade_adjusted_pace_s_per_km: Option<f64>,
    pub distance_source: DistanceSource,
    /// Sample count before downsampling, when the budget was applied
    pub downsampled_from: Option<usize>,
}

/// Whole-activity totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub sample_count: usize,
    pub total_distance_m: f64,
    pub elapsed_s: f64,
    /// Time spent between samples where distance increased
    pub moving_s: f64,
    /// From the smoothed elevation trace
    pub elevation_gain_m: Option<f64>,
    pub elevation_loss_m: Option<f64>,
    pub avg_hr_bpm: Option<f64>,
    pub max_hr_bpm: Option<f64>,
    pub avg_power_w: Option<f64>,
    pub max_power_w: Option<f64>,
    /// Average pace over elapsed time, seconds per kilometer
    pub avg_pace_s_per_km: Option<f64>,
    pub grade_adjusted_pace_s_per_km: Option<f64>,
}

/// Everything derived from one activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityAnalysis {
    pub series: AnalysisSeries,
    pub zones: ZoneBins,
    pub swim: Option<SwimSets>,
    pub summary: ActivitySummary,
}

/// Runs the analysis pipeline with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct ActivityAnalyzer {
    config: AnalysisConfig,
}

impl ActivityAnalyzer {
    /// Create an analyzer, rejecting invalid configuration.
    pub fn new(config: AnalysisConfig) -> AnalyticsResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one activity.
    pub fn analyze(
        &self,
        bundle: &TelemetryBundle,
        request: &AnalysisRequest,
    ) -> AnalyticsResult<ActivityAnalysis> {
        let mut series =
            SeriesNormalizer::from_config(&self.config).normalize(&bundle.points, &bundle.samples);
        let distance_source = ElevationResolver::from_config(&self.config).resolve(&mut series);
        MetricDeriver::from_config(&self.config).derive(&mut series);
        series.validate()?;

        let summary = summarize(&series);

        let swim_analyzer = SwimAnalyzer::new(self.config.swim.clone());
        let (zones, swim) = rayon::join(
            || self.classify(&series, &request.zones),
            || {
                swim_analyzer.analyze(
                    bundle.lengths.as_deref(),
                    bundle.laps.as_deref(),
                    &request.pool,
                    request.units,
                )
            },
        );
        let zones = zones?;

        let full_len = series.len();
        let (series, downsampled_from) = match request.point_budget {
            Some(budget) if full_len > budget => (downsample(&series, budget), Some(full_len)),
            _ => (series, None),
        };

        tracing::info!(
            samples = full_len,
            distance_m = summary.total_distance_m,
            elapsed_s = summary.elapsed_s,
            swim = swim.is_some(),
            "Analyzed activity"
        );

        Ok(ActivityAnalysis {
            series: AnalysisSeries {
                series,
                grade_adjusted_pace_s_per_km: summary.grade_adjusted_pace_s_per_km,
                distance_source,
                downsampled_from,
            },
            zones,
            swim,
            summary,
        })
    }

    fn classify(
        &self,
        series: &CanonicalSeries,
        request: &ZoneRequest,
    ) -> AnalyticsResult<ZoneBins> {
        let weighting = self.config.zones.weighting;
        let heart_rate = request
            .heart_rate
            .as_ref()
            .map(|source| {
                classify_series(&source.definition()?, &series.hr_bpm, &series.time_s, weighting)
            })
            .transpose()?;
        let power = request
            .power
            .as_ref()
            .map(|source| {
                classify_series(&source.definition()?, &series.power_w, &series.time_s, weighting)
            })
            .transpose()?;
        Ok(ZoneBins { heart_rate, power })
    }
}

/// Analyze one activity with default configuration.
pub fn analyze(
    bundle: &TelemetryBundle,
    request: &AnalysisRequest,
) -> AnalyticsResult<ActivityAnalysis> {
    ActivityAnalyzer::default().analyze(bundle, request)
}

/// Whole-activity totals over a resolved series.
pub fn summarize(series: &CanonicalSeries) -> ActivitySummary {
    let total_distance_m = series.total_distance_m();
    let elapsed_s = series.duration_s();

    let moving_s = series
        .time_s
        .windows(2)
        .zip(series.distance_m.windows(2))
        .filter(|(_, d)| d[1] > d[0])
        .map(|(t, _)| t[1] - t[0])
        .sum();

    let (elevation_gain_m, elevation_loss_m) = elevation_totals(&series.elevation_m);

    let avg_pace_s_per_km =
        (total_distance_m > 0.0 && elapsed_s > 0.0).then(|| elapsed_s / total_distance_m * 1000.0);
    let grade_adjusted_pace_s_per_km = grade_adjusted_pace(
        Some(total_distance_m),
        Some(elapsed_s),
        elevation_gain_m,
    );

    ActivitySummary {
        sample_count: series.len(),
        total_distance_m,
        elapsed_s,
        moving_s,
        elevation_gain_m,
        elevation_loss_m,
        avg_hr_bpm: mean(&series.hr_bpm),
        max_hr_bpm: max(&series.hr_bpm),
        avg_power_w: mean(&series.power_w),
        max_power_w: max(&series.power_w),
        avg_pace_s_per_km,
        grade_adjusted_pace_s_per_km,
    }
}

/// Total climb and descent between consecutive present elevations.
fn elevation_totals(elevation: &[Option<f64>]) -> (Option<f64>, Option<f64>) {
    let present: Vec<f64> = elevation.iter().flatten().copied().collect();
    if present.is_empty() {
        return (None, None);
    }
    let (gain, loss) = present.windows(2).fold((0.0, 0.0), |(gain, loss), w| {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            (gain + delta, loss)
        } else {
            (gain, loss - delta)
        }
    });
    (Some(gain), Some(loss))
}

fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn max(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::max)
}

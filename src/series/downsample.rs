//! Point-budget downsampling.
//!
//! Derived metrics are computed on the full-resolution series first; the
//! downsampler only picks which samples to keep, so every kept value is an
//! original one. The first and last samples are always kept.

use super::CanonicalSeries;

/// Evenly spaced sample indices, at most `budget` of them.
pub fn downsample_indices(len: usize, budget: usize) -> Vec<usize> {
    if budget == 0 || len == 0 {
        return Vec::new();
    }
    if len <= budget {
        return (0..len).collect();
    }
    if budget == 1 {
        return vec![0];
    }

    let last = (len - 1) as f64;
    let steps = (budget - 1) as f64;
    let mut indices: Vec<usize> = (0..budget)
        .map(|k| ((k as f64) * last / steps).round() as usize)
        .collect();
    indices.dedup();
    indices
}

/// Reduce `series` to at most `budget` samples.
pub fn downsample(series: &CanonicalSeries, budget: usize) -> CanonicalSeries {
    if series.len() <= budget {
        return series.clone();
    }
    let indices = downsample_indices(series.len(), budget);
    tracing::debug!(from = series.len(), to = indices.len(), "Downsampled series");
    series.select(&indices)
}

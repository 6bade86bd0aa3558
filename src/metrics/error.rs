//! Analytics error types.
//!
//! Per-sample problems never surface here; they degrade to `None` in the
//! derived series. These errors are reserved for structurally invalid input
//! and unusable configuration.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur during activity analysis.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A series column does not have the same length as the time column.
    #[error("Mismatched series lengths: `{column}` has {actual} entries, expected {expected}")]
    MismatchedLengths {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A series column that must be non-decreasing goes backwards.
    #[error("Series column `{column}` decreases at index {index}")]
    NonMonotonic { column: &'static str, index: usize },

    /// Zone boundaries do not cover [0, inf) without gaps or overlaps.
    #[error("Invalid zone definition: {0}")]
    InvalidZones(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or saved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

//! Causal smoothing filters.

/// Exponential moving average.
///
/// Each output depends only on the inputs seen so far, so the filter can be
/// fed point by point from a live stream.
#[derive(Debug, Clone)]
pub struct EmaSmoother {
    /// Weight given to the newest reading (0 < alpha <= 1)
    alpha: f64,
    /// Current smoothed value, `None` until the first reading
    current: Option<f64>,
}

impl EmaSmoother {
    /// Create a new smoother with the given smoothing factor.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            current: None,
        }
    }

    /// Feed one reading and return the smoothed value.
    ///
    /// A missing reading leaves the state untouched and yields `None`; the
    /// first real reading seeds the average.
    pub fn add(&mut self, value: Option<f64>) -> Option<f64> {
        let value = value.filter(|v| v.is_finite())?;

        let next = match self.current {
            Some(previous) => previous + self.alpha * (value - previous),
            None => value,
        };
        self.current = Some(next);
        Some(next)
    }

    /// Current smoothed value without adding a reading.
    pub fn value(&self) -> Option<f64> {
        self.current
    }

    /// Reset the smoother.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

/// Smooth a whole trace with a fresh [`EmaSmoother`].
pub fn smooth_trace(values: &[Option<f64>], alpha: f64) -> Vec<Option<f64>> {
    let mut smoother = EmaSmoother::new(alpha);
    values.iter().map(|&v| smoother.add(v)).collect()
}

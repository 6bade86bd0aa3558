//! Trailing time windows over a non-decreasing time axis.
//!
//! Pace and VAM both look back from each sample to the closest earlier
//! sample at least `W` seconds away. The walk is shared here; each metric
//! only supplies how to aggregate a window.

/// A window `[start, end]` of sample indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSpan {
    /// First index in the window
    pub start: usize,
    /// Last index in the window (the sample being derived)
    pub end: usize,
    /// `time[end] - time[start]`, always at least the window width
    pub duration_s: f64,
}

/// Iterator yielding the trailing window for every index of `time`.
///
/// Yields `None` for indices with less than `window_s` of history,
/// including index 0.
#[derive(Debug, Clone)]
pub struct TrailingWindow<'a> {
    time: &'a [f64],
    window_s: f64,
    start: usize,
    end: usize,
}

impl<'a> TrailingWindow<'a> {
    /// Create a window walker over a non-decreasing time column.
    pub fn new(time: &'a [f64], window_s: f64) -> Self {
        Self {
            time,
            window_s,
            start: 0,
            end: 0,
        }
    }
}

impl Iterator for TrailingWindow<'_> {
    type Item = Option<WindowSpan>;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.end;
        let t_end = *self.time.get(end)?;
        self.end += 1;

        // Slide start forward while the window stays at least `window_s`
        // wide. Time never decreases, so `start` only moves forward.
        while self.start + 1 < end && t_end - self.time[self.start + 1] >= self.window_s {
            self.start += 1;
        }

        let duration_s = t_end - self.time[self.start];
        if self.start < end && duration_s >= self.window_s && duration_s > 0.0 {
            Some(Some(WindowSpan {
                start: self.start,
                end,
                duration_s,
            }))
        } else {
            Some(None)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.time.len().saturating_sub(self.end);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrailingWindow<'_> {}

/// Map every index of `time` through `aggregate` over its trailing window.
///
/// Indices without a full window, and windows the aggregate rejects, are
/// `None`.
pub fn trailing_map<F>(time: &[f64], window_s: f64, mut aggregate: F) -> Vec<Option<f64>>
where
    F: FnMut(WindowSpan) -> Option<f64>,
{
    TrailingWindow::new(time, window_s)
        .map(|span| span.and_then(&mut aggregate))
        .collect()
}

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Logical width of one data point on the x axis.
pub const X_UNIT_LEN: f64 = 1.0;

/// Inclusive window of data indices `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexWindow {
    start: usize,
    end: usize,
}

impl IndexWindow {
    pub fn new(start: usize, end: usize) -> ChartResult<Self> {
        if start > end {
            return Err(ChartError::InvalidData(format!(
                "index window start {start} must be <= end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Window covering both indices regardless of their order.
    #[must_use]
    pub fn spanning(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    #[must_use]
    pub fn start(self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(self) -> usize {
        self.end
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.end - self.start + 1
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

/// A `(from, to)` pair on one logical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalRange {
    pub from: f64,
    pub to: f64,
}

impl LogicalRange {
    #[must_use]
    pub const fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn len(self) -> f64 {
        self.to - self.from
    }

    /// All values in the window were equal.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.len() == 0.0
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.from.is_finite() && self.to.is_finite()
    }

    #[must_use]
    pub fn include(self, value: f64) -> Self {
        Self {
            from: self.from.min(value),
            to: self.to.max(value),
        }
    }
}

/// Logical x range of a window: `[start, end + 1)`.
///
/// The extra unit keeps the full width of the last visible point on screen.
/// This rule is shared by every panel.
#[must_use]
pub fn x_logical_range(window: IndexWindow) -> LogicalRange {
    LogicalRange::new(window.start as f64, window.end as f64 + X_UNIT_LEN)
}

/// Panel-specific y range of the values inside an index window.
pub trait ValueRangeProvider {
    fn value_range(&self, window: IndexWindow) -> LogicalRange;
}

impl<F> ValueRangeProvider for F
where
    F: Fn(IndexWindow) -> LogicalRange,
{
    fn value_range(&self, window: IndexWindow) -> LogicalRange {
        self(window)
    }
}

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::candle::OhlcBar;
use crate::core::logical_range::{IndexWindow, LogicalRange, ValueRangeProvider};

/// Output of an indicator calculation: several lines, one optional value per
/// data index (`None` while the indicator is still warming up).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSeries {
    lines: Vec<Vec<Option<f64>>>,
}

impl IndicatorSeries {
    #[must_use]
    pub fn new(lines: Vec<Vec<Option<f64>>>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[Vec<Option<f64>>] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, line: usize) -> Option<&[Option<f64>]> {
        self.lines.get(line).map(Vec::as_slice)
    }

    #[must_use]
    pub fn value_at(&self, line: usize, index: usize) -> Option<f64> {
        self.lines.get(line)?.get(index).copied().flatten()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(Vec::is_empty)
    }
}

impl ValueRangeProvider for IndicatorSeries {
    /// Range over every present value of every line in the window, always
    /// widened to include zero so histogram baselines stay on screen.
    fn value_range(&self, window: IndexWindow) -> LogicalRange {
        let mut range = LogicalRange::new(0.0, 0.0);
        for line in &self.lines {
            let visible = line
                .iter()
                .enumerate()
                .filter(|(idx, _)| window.contains(*idx))
                .filter_map(|(_, value)| value.filter(|v| v.is_finite()))
                .map(OrderedFloat);
            let (min, max) = visible.fold((None, None), |(min, max), value| {
                (
                    Some(min.map_or(value, |m: OrderedFloat<f64>| m.min(value))),
                    Some(max.map_or(value, |m: OrderedFloat<f64>| m.max(value))),
                )
            });
            if let (Some(min), Some(max)) = (min, max) {
                range = range.include(min.0).include(max.0);
            }
        }
        range
    }
}

/// Opaque indicator function (KDJ, MACD, ...) evaluated on the candle series.
pub trait IndicatorCalculator {
    fn calculate(&self, candles: &[OhlcBar]) -> IndicatorSeries;
}

impl<F> IndicatorCalculator for F
where
    F: Fn(&[OhlcBar]) -> IndicatorSeries,
{
    fn calculate(&self, candles: &[OhlcBar]) -> IndicatorSeries {
        self(candles)
    }
}

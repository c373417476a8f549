use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{IndexWindow, IndicatorCalculator, IndicatorSeries, LogicalRange, OhlcBar, ValueRangeProvider};
use crate::error::ChartResult;
use crate::render::{Color, RenderFrame};

use super::{LineStyle, PanelDrawContext, PanelSeries};

const K_LINE: usize = 0;
const D_LINE: usize = 1;
const J_LINE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KdjStyle {
    #[serde(default = "default_k_line")]
    pub k_line: LineStyle,
    #[serde(default = "default_d_line")]
    pub d_line: LineStyle,
    #[serde(default = "default_j_line")]
    pub j_line: LineStyle,
}

impl Default for KdjStyle {
    fn default() -> Self {
        Self {
            k_line: default_k_line(),
            d_line: default_d_line(),
            j_line: default_j_line(),
        }
    }
}

fn default_k_line() -> LineStyle {
    LineStyle::new(Color::rgb(1.0, 0.6, 0.0), 1.5)
}

fn default_d_line() -> LineStyle {
    LineStyle::new(Color::rgb(0.2, 0.6, 1.0), 1.5)
}

fn default_j_line() -> LineStyle {
    LineStyle::new(Color::rgb(0.8, 0.3, 0.8), 1.5)
}

/// KDJ panel: K, D and J lines from an indicator calculator.
pub struct KdjSeries {
    calculator: Box<dyn IndicatorCalculator>,
    style: KdjStyle,
    values: IndicatorSeries,
}

impl KdjSeries {
    #[must_use]
    pub fn new(calculator: impl IndicatorCalculator + 'static, style: KdjStyle) -> Self {
        Self {
            calculator: Box::new(calculator),
            style,
            values: IndicatorSeries::default(),
        }
    }

    #[must_use]
    pub fn style(&self) -> KdjStyle {
        self.style
    }

    #[must_use]
    pub fn values(&self) -> &IndicatorSeries {
        &self.values
    }
}

impl fmt::Debug for KdjSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdjSeries")
            .field("style", &self.style)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl PanelSeries for KdjSeries {
    fn on_data_changed(&mut self, candles: &[OhlcBar]) {
        self.values = self.calculator.calculate(candles);
    }

    fn value_range(&self, window: IndexWindow) -> LogicalRange {
        self.values.value_range(window)
    }

    fn build(&self, ctx: &PanelDrawContext<'_>, frame: &mut RenderFrame) -> ChartResult<()> {
        for (line, style) in [
            (K_LINE, self.style.k_line),
            (D_LINE, self.style.d_line),
            (J_LINE, self.style.j_line),
        ] {
            if let Some(values) = self.values.line(line) {
                ctx.push_value_line(values, style, frame);
            }
        }
        Ok(())
    }
}

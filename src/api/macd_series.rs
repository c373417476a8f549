use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{
    IndexWindow, IndicatorCalculator, IndicatorSeries, LogicalRange, OhlcBar, Rect,
    ValueRangeProvider,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, RectPrimitive, RenderFrame};

use super::{LineStyle, PanelDrawContext, PanelSeries};

const DIF_LINE: usize = 0;
const DEA_LINE: usize = 1;
const MACD_BARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdStyle {
    #[serde(default = "default_dif_line")]
    pub dif_line: LineStyle,
    #[serde(default = "default_dea_line")]
    pub dea_line: LineStyle,
    /// Share of each index slot left empty between histogram bars, in `[0, 1)`.
    #[serde(default = "default_bar_space_ratio")]
    pub bar_space_ratio: f64,
}

impl Default for MacdStyle {
    fn default() -> Self {
        Self {
            dif_line: default_dif_line(),
            dea_line: default_dea_line(),
            bar_space_ratio: default_bar_space_ratio(),
        }
    }
}

impl MacdStyle {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.bar_space_ratio.is_finite() || !(0.0..1.0).contains(&self.bar_space_ratio) {
            return Err(ChartError::InvalidData(
                "bar space ratio must be finite and in [0, 1)".to_owned(),
            ));
        }
        self.dif_line.validate()?;
        self.dea_line.validate()?;
        Ok(self)
    }
}

fn default_dif_line() -> LineStyle {
    LineStyle::new(Color::rgb(1.0, 0.6, 0.0), 1.5)
}

fn default_dea_line() -> LineStyle {
    LineStyle::new(Color::rgb(0.2, 0.6, 1.0), 1.5)
}

fn default_bar_space_ratio() -> f64 {
    0.33
}

/// MACD panel: DIF and DEA lines over a histogram colored by sign.
pub struct MacdSeries {
    calculator: Box<dyn IndicatorCalculator>,
    style: MacdStyle,
    values: IndicatorSeries,
}

impl MacdSeries {
    pub fn new(calculator: impl IndicatorCalculator + 'static, style: MacdStyle) -> ChartResult<Self> {
        Ok(Self {
            calculator: Box::new(calculator),
            style: style.validate()?,
            values: IndicatorSeries::default(),
        })
    }

    #[must_use]
    pub fn style(&self) -> MacdStyle {
        self.style
    }

    #[must_use]
    pub fn values(&self) -> &IndicatorSeries {
        &self.values
    }
}

impl fmt::Debug for MacdSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacdSeries")
            .field("style", &self.style)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl PanelSeries for MacdSeries {
    fn on_data_changed(&mut self, candles: &[OhlcBar]) {
        self.values = self.calculator.calculate(candles);
    }

    fn value_range(&self, window: IndexWindow) -> LogicalRange {
        self.values.value_range(window)
    }

    fn build(&self, ctx: &PanelDrawContext<'_>, frame: &mut RenderFrame) -> ChartResult<()> {
        let half_space = self.style.bar_space_ratio / 2.0;
        if let Some(bars) = self.values.line(MACD_BARS) {
            for (index, value) in bars.iter().enumerate() {
                let Some(value) = *value else {
                    continue;
                };
                let logical = Rect::new(
                    index as f64 + half_space,
                    value,
                    index as f64 + 1.0 - half_space,
                    0.0,
                );
                let mapped = ctx.mapper.forward_rect(logical);
                let color = if value >= 0.0 {
                    ctx.config.rise_color
                } else {
                    ctx.config.down_color
                };
                frame.push_rect(RectPrimitive::new(
                    mapped.left,
                    mapped.top,
                    mapped.right,
                    mapped.bottom,
                    color,
                ));
            }
        }

        for (line, style) in [
            (DIF_LINE, self.style.dif_line),
            (DEA_LINE, self.style.dea_line),
        ] {
            if let Some(values) = self.values.line(line) {
                ctx.push_value_line(values, style, frame);
            }
        }
        Ok(())
    }
}


use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{IndexWindow, LogicalRange, OhlcBar};
use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, Color, RenderFrame};

use super::{PanelDrawContext, PanelSeries};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AveragePriceStyle {
    #[serde(default = "default_dot_color")]
    pub dot_color: Color,
    #[serde(default = "default_dot_radius")]
    pub dot_radius: f64,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: Color,
    #[serde(default = "default_highlight_radius")]
    pub highlight_radius: f64,
}

impl Default for AveragePriceStyle {
    fn default() -> Self {
        Self {
            dot_color: default_dot_color(),
            dot_radius: default_dot_radius(),
            highlight_color: default_highlight_color(),
            highlight_radius: default_highlight_radius(),
        }
    }
}

impl AveragePriceStyle {
    pub fn validate(self) -> ChartResult<Self> {
        for radius in [self.dot_radius, self.highlight_radius] {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ChartError::InvalidData(
                    "dot radius must be finite and > 0".to_owned(),
                ));
            }
        }
        self.dot_color.validate()?;
        self.highlight_color.validate()?;
        Ok(self)
    }
}

fn default_dot_color() -> Color {
    Color::rgb(1.0, 0.0, 0.0)
}

fn default_dot_radius() -> f64 {
    10.0
}

fn default_highlight_color() -> Color {
    Color::rgb(1.0, 1.0, 0.0)
}

fn default_highlight_radius() -> f64 {
    20.0
}

/// Custom panel plotting one dot per candle at its `(high + low) / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragePriceSeries {
    style: AveragePriceStyle,
    averages: Vec<f64>,
}

impl AveragePriceSeries {
    pub fn new(style: AveragePriceStyle) -> ChartResult<Self> {
        Ok(Self {
            style: style.validate()?,
            averages: Vec::new(),
        })
    }

    #[must_use]
    pub fn averages(&self) -> &[f64] {
        &self.averages
    }
}

impl PanelSeries for AveragePriceSeries {
    fn on_data_changed(&mut self, candles: &[OhlcBar]) {
        self.averages = candles.iter().map(|bar| bar.average_price()).collect();
    }

    /// Exact min/max of the visible averages; `(0, 0)` when none are visible.
    fn value_range(&self, window: IndexWindow) -> LogicalRange {
        let visible = self
            .averages
            .iter()
            .enumerate()
            .filter(|(index, _)| window.contains(*index))
            .map(|(_, average)| OrderedFloat(*average));
        let min = visible.clone().min();
        let max = visible.max();
        match (min, max) {
            (Some(min), Some(max)) => LogicalRange::new(min.0, max.0),
            _ => LogicalRange::new(0.0, 0.0),
        }
    }

    fn build(&self, ctx: &PanelDrawContext<'_>, frame: &mut RenderFrame) -> ChartResult<()> {
        for (index, average) in self.averages.iter().enumerate() {
            let center = ctx.map(index as f64 + 0.5, *average);
            frame.push_circle(CirclePrimitive::new(
                center.x,
                center.y,
                self.style.dot_radius,
                self.style.dot_color,
            ));
        }

        let highlighted = ctx
            .highlight
            .filter(|highlight| ctx.areas.full().contains_x(highlight.x))
            .and_then(|highlight| {
                let average = self.averages.get(highlight.index)?;
                Some(ctx.map(highlight.index_center_x(), *average))
            });
        if let Some(center) = highlighted {
            frame.push_circle(CirclePrimitive::new(
                center.x,
                center.y,
                self.style.highlight_radius,
                self.style.highlight_color,
            ));
        }
        Ok(())
    }
}

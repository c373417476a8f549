use serde::{Deserialize, Serialize};

use crate::core::{IndexWindow, PanelInsets};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Stroke color and width of a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0.6, 0.6, 0.6),
            width: 1.0,
        }
    }
}

impl LineStyle {
    #[must_use]
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()?;
        Ok(self)
    }
}

/// Chart-level configuration shared by every panel.
///
/// Serializable so hosts can persist chart setups as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockChartConfig {
    #[serde(default)]
    pub show_start_index: usize,
    #[serde(default = "default_show_end_index")]
    pub show_end_index: usize,
    /// `false` snaps scrolling to whole data points.
    #[serde(default)]
    pub scroll_smoothly: bool,
    #[serde(default = "default_true")]
    pub show_highlight_horizontal_line: bool,
    #[serde(default = "default_true")]
    pub show_highlight_vertical_line: bool,
    #[serde(default)]
    pub highlight_horizontal_line: LineStyle,
    #[serde(default)]
    pub highlight_vertical_line: LineStyle,
    #[serde(default = "default_rise_color")]
    pub rise_color: Color,
    #[serde(default = "default_down_color")]
    pub down_color: Color,
}

impl Default for StockChartConfig {
    fn default() -> Self {
        Self {
            show_start_index: 0,
            show_end_index: default_show_end_index(),
            scroll_smoothly: false,
            show_highlight_horizontal_line: true,
            show_highlight_vertical_line: true,
            highlight_horizontal_line: LineStyle::default(),
            highlight_vertical_line: LineStyle::default(),
            rise_color: default_rise_color(),
            down_color: default_down_color(),
        }
    }
}

impl StockChartConfig {
    /// Config showing the inclusive index window `[start, end]`.
    #[must_use]
    pub fn new(show_start_index: usize, show_end_index: usize) -> Self {
        Self {
            show_start_index,
            show_end_index,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_scroll_smoothly(mut self, scroll_smoothly: bool) -> Self {
        self.scroll_smoothly = scroll_smoothly;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.show_window()?;
        self.highlight_horizontal_line.validate()?;
        self.highlight_vertical_line.validate()?;
        self.rise_color.validate()?;
        self.down_color.validate()?;
        Ok(self)
    }

    /// Requested visible window; indices past the data stay as empty slots.
    pub fn show_window(self) -> ChartResult<IndexWindow> {
        IndexWindow::new(self.show_start_index, self.show_end_index)
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.validate()
    }
}

/// Per-panel layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Requested panel height in pixels; the host's layout decides the final size.
    #[serde(default = "default_panel_height")]
    pub height: f64,
    #[serde(default)]
    pub margin_top: f64,
    #[serde(default)]
    pub margin_bottom: f64,
    #[serde(default)]
    pub insets: PanelInsets,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            height: default_panel_height(),
            margin_top: 0.0,
            margin_bottom: 0.0,
            insets: PanelInsets::default(),
        }
    }
}

impl PanelConfig {
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_main_padding(mut self, top: f64, bottom: f64) -> Self {
        self.insets = self.insets.with_main_padding(top, bottom);
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(ChartError::InvalidData(
                "panel height must be finite and > 0".to_owned(),
            ));
        }
        if !self.margin_top.is_finite()
            || !self.margin_bottom.is_finite()
            || self.margin_top < 0.0
            || self.margin_bottom < 0.0
        {
            return Err(ChartError::InvalidData(
                "panel margins must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

fn default_true() -> bool {
    true
}

fn default_show_end_index() -> usize {
    59
}

fn default_panel_height() -> f64 {
    200.0
}

fn default_rise_color() -> Color {
    Color::rgb(0.93, 0.27, 0.27)
}

fn default_down_color() -> Color {
    Color::rgb(0.13, 0.69, 0.39)
}

#[cfg(test)]
mod tests {
    use super::{PanelConfig, StockChartConfig};

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            StockChartConfig::from_json_str(r#"{"show_start_index": 5, "show_end_index": 24}"#)
                .expect("parse");
        assert_eq!(config.show_start_index, 5);
        assert_eq!(config.show_end_index, 24);
        assert!(!config.scroll_smoothly);
        assert!(config.show_highlight_vertical_line);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = StockChartConfig::new(10, 40).with_scroll_smoothly(true);
        let json = config.to_json_pretty().expect("serialize");
        assert_eq!(StockChartConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn reversed_show_window_is_rejected() {
        assert!(StockChartConfig::from_json_str(r#"{"show_start_index": 9, "show_end_index": 3}"#).is_err());
    }

    #[test]
    fn negative_panel_margin_is_rejected() {
        let config = PanelConfig {
            margin_top: -1.0,
            ..PanelConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

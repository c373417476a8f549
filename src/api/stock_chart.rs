use tracing::{debug, trace};

use crate::core::{AffineTransform, ExternalTransforms, IndexWindow, OhlcBar};
use crate::error::{ChartError, ChartResult};

use super::StockChartConfig;

/// Chart-level state shared by every panel.
///
/// Holds the candle series, the visible window and the x-axis transforms.
/// Panels only read it; gesture handling mutates it between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct StockChart {
    config: StockChartConfig,
    candles: Vec<OhlcBar>,
    external: ExternalTransforms,
    data_generation: u64,
}

impl StockChart {
    pub fn new(config: StockChartConfig) -> ChartResult<Self> {
        Ok(Self {
            config: config.validate()?,
            candles: Vec::new(),
            external: ExternalTransforms::default(),
            data_generation: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &StockChartConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: StockChartConfig) -> ChartResult<()> {
        let window_changed = self.config.show_window()? != config.validate()?.show_window()?;
        self.config = config;
        if window_changed {
            self.bump_generation();
        }
        Ok(())
    }

    /// Replaces the candle series.
    pub fn set_candles(&mut self, candles: Vec<OhlcBar>) {
        debug!(count = candles.len(), "set candles");
        self.candles = candles;
        self.bump_generation();
    }

    /// Appends newer candles to the end of the series.
    pub fn append_candles(&mut self, candles: impl IntoIterator<Item = OhlcBar>) {
        let before = self.candles.len();
        self.candles.extend(candles);
        trace!(
            appended = self.candles.len() - before,
            count = self.candles.len(),
            "append candles"
        );
        self.bump_generation();
    }

    #[must_use]
    pub fn candles(&self) -> &[OhlcBar] {
        &self.candles
    }

    #[must_use]
    pub fn data_count(&self) -> usize {
        self.candles.len()
    }

    /// Increments whenever the data set or the requested window changes.
    #[must_use]
    pub fn data_generation(&self) -> u64 {
        self.data_generation
    }

    /// Requested window as stored, `None` while there is no data.
    ///
    /// The window may reach past the last candle. The base scale always spans
    /// the whole request and value ranges only see indices that exist.
    #[must_use]
    pub fn visible_window(&self) -> Option<IndexWindow> {
        if self.candles.is_empty() {
            return None;
        }
        self.config.show_window().ok()
    }

    pub fn set_visible_window(&mut self, start: usize, end: usize) -> ChartResult<()> {
        let window = IndexWindow::new(start, end)?;
        if window != self.config.show_window()? {
            self.config.show_start_index = start;
            self.config.show_end_index = end;
            self.bump_generation();
        }
        Ok(())
    }

    #[must_use]
    pub fn external_transforms(&self) -> &ExternalTransforms {
        &self.external
    }

    pub fn set_x_scale_matrix(&mut self, matrix: AffineTransform) -> ChartResult<()> {
        self.external.x_scale = validate_matrix(matrix, "x scale")?;
        Ok(())
    }

    pub fn set_fix_x_scale_matrix(&mut self, matrix: AffineTransform) -> ChartResult<()> {
        self.external.fix_x_scale = validate_matrix(matrix, "fix x scale")?;
        Ok(())
    }

    pub fn set_scroll_matrix(&mut self, matrix: AffineTransform) -> ChartResult<()> {
        self.external.scroll = validate_matrix(matrix, "scroll")?;
        Ok(())
    }

    /// Pans all panels by `dx` pixels.
    pub fn scroll_by(&mut self, dx: f64) -> ChartResult<()> {
        if !dx.is_finite() {
            return Err(ChartError::InvalidData(
                "scroll delta must be finite".to_owned(),
            ));
        }
        self.external.scroll = self.external.scroll.post_translate(dx, 0.0);
        Ok(())
    }

    /// Zooms the x axis by `factor` around the pixel column `pivot_x`.
    pub fn zoom_x_about(&mut self, factor: f64, pivot_x: f64) -> ChartResult<()> {
        if !factor.is_finite() || factor <= 0.0 || !pivot_x.is_finite() {
            return Err(ChartError::InvalidData(
                "zoom factor must be finite and > 0 with a finite pivot".to_owned(),
            ));
        }
        self.external.x_scale = self.external.x_scale.post_scale(factor, 1.0, pivot_x, 0.0);
        Ok(())
    }

    pub fn reset_transforms(&mut self) {
        self.external = ExternalTransforms::default();
    }

    fn bump_generation(&mut self) {
        self.data_generation = self.data_generation.wrapping_add(1);
    }
}

fn validate_matrix(matrix: AffineTransform, name: &str) -> ChartResult<AffineTransform> {
    if !matrix.is_finite() {
        return Err(ChartError::InvalidData(format!(
            "{name} matrix must be finite"
        )));
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::StockChart;
    use crate::api::StockChartConfig;
    use crate::core::{IndexWindow, OhlcBar};

    fn bars(count: usize) -> Vec<OhlcBar> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64;
                OhlcBar::new(i as f64 * 60.0, base, base + 1.0, base - 1.0, base + 0.5)
                    .expect("bar")
            })
            .collect()
    }

    #[test]
    fn visible_window_keeps_requested_extent_past_the_data() {
        let mut chart = StockChart::new(StockChartConfig::new(0, 59)).expect("chart");
        assert_eq!(chart.visible_window(), None);

        chart.set_candles(bars(20));
        assert_eq!(chart.visible_window(), Some(IndexWindow::new(0, 59).expect("window")));

        chart.set_visible_window(20, 40).expect("window");
        assert_eq!(chart.visible_window(), Some(IndexWindow::new(20, 40).expect("window")));
    }

    #[test]
    fn data_and_window_changes_bump_generation() {
        let mut chart = StockChart::new(StockChartConfig::new(0, 9)).expect("chart");
        let g0 = chart.data_generation();
        chart.set_candles(bars(10));
        let g1 = chart.data_generation();
        assert_ne!(g0, g1);

        chart.set_visible_window(0, 9).expect("same window");
        assert_eq!(chart.data_generation(), g1);

        chart.set_visible_window(2, 9).expect("new window");
        assert_ne!(chart.data_generation(), g1);
    }

    #[test]
    fn scroll_and_zoom_accumulate_on_external_matrices() {
        let mut chart = StockChart::new(StockChartConfig::default()).expect("chart");
        chart.scroll_by(-15.0).expect("scroll");
        chart.scroll_by(-5.0).expect("scroll");
        assert_eq!(chart.external_transforms().scroll.trans_x, -20.0);

        chart.zoom_x_about(2.0, 100.0).expect("zoom");
        assert_eq!(chart.external_transforms().x_scale.scale_x, 2.0);
        assert_eq!(chart.external_transforms().x_scale.trans_x, -100.0);

        assert!(chart.zoom_x_about(0.0, 100.0).is_err());
        chart.reset_transforms();
        assert!(chart.external_transforms().x_chain().is_identity());
    }
}

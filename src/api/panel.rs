use tracing::{debug, trace};

use crate::core::{
    ComposedMapper, FrameInputs, IndexWindow, LogicalRange, OhlcBar, PanelAreas, Point,
    TransformPipeline, Viewport,
};
use crate::error::ChartResult;
use crate::interaction::{Highlight, InteractionState, resolve_highlight};
use crate::render::{LinePrimitive, RenderFrame, Renderer};

use super::{LineStyle, PanelConfig, StockChart, StockChartConfig};

/// Content drawn by one panel.
///
/// Implementations own whatever they derive from the candles (indicator
/// lines, averages) and emit primitives through the composed mapper only.
pub trait PanelSeries {
    /// Recomputes derived data after the candle series changed.
    fn on_data_changed(&mut self, candles: &[OhlcBar]);

    /// Value range over the inclusive index window.
    fn value_range(&self, window: IndexWindow) -> LogicalRange;

    fn build(&self, ctx: &PanelDrawContext<'_>, frame: &mut RenderFrame) -> ChartResult<()>;
}

/// Everything a series needs to emit one frame.
#[derive(Debug, Clone, Copy)]
pub struct PanelDrawContext<'a> {
    pub mapper: ComposedMapper,
    pub areas: PanelAreas,
    pub window: IndexWindow,
    pub candles: &'a [OhlcBar],
    pub config: &'a StockChartConfig,
    pub highlight: Option<Highlight>,
}

impl PanelDrawContext<'_> {
    /// Maps a logical point to panel pixels.
    #[must_use]
    pub fn map(&self, x: f64, y: f64) -> Point {
        self.mapper.forward_point(Point::new(x, y))
    }

    /// Joins consecutive present values at their index centers; a missing
    /// value breaks the line.
    pub fn push_value_line(&self, values: &[Option<f64>], style: LineStyle, frame: &mut RenderFrame) {
        for (index, pair) in values.windows(2).enumerate() {
            let (Some(prev), Some(value)) = (pair[0], pair[1]) else {
                continue;
            };
            let from = self.map(index as f64 + 0.5, prev);
            let to = self.map(index as f64 + 1.5, value);
            frame.push_line(LinePrimitive::new(
                from.x,
                from.y,
                to.x,
                to.y,
                style.width,
                style.color,
            ));
        }
    }
}

/// One stacked child chart: its areas, transform pipeline and series.
#[derive(Debug)]
pub struct ChartPanel<S: PanelSeries> {
    series: S,
    config: PanelConfig,
    viewport: Option<Viewport>,
    areas: Option<PanelAreas>,
    pipeline: TransformPipeline,
    seen_generation: Option<u64>,
    coordinate_stale: bool,
    interaction: InteractionState,
}

impl<S: PanelSeries> ChartPanel<S> {
    pub fn new(series: S, config: PanelConfig) -> ChartResult<Self> {
        Ok(Self {
            series,
            config: config.validate()?,
            viewport: None,
            areas: None,
            pipeline: TransformPipeline::new(),
            seen_generation: None,
            coordinate_stale: true,
            interaction: InteractionState::default(),
        })
    }

    #[must_use]
    pub fn series(&self) -> &S {
        &self.series
    }

    #[must_use]
    pub fn config(&self) -> PanelConfig {
        self.config
    }

    #[must_use]
    pub fn areas(&self) -> Option<PanelAreas> {
        self.areas
    }

    #[must_use]
    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    /// Lays out the display areas for the new size.
    ///
    /// The coordinate matrix is rebuilt lazily on the next draw or hit-test.
    pub fn on_size_changed(&mut self, width: u32, height: u32) -> ChartResult<()> {
        let viewport = Viewport::new(width, height).validate()?;
        let areas = PanelAreas::layout(viewport.width_px(), viewport.height_px(), self.config.insets)?;
        debug!(width, height, main_top = areas.main().top, main_bottom = areas.main().bottom, "panel resized");
        self.viewport = Some(viewport);
        self.areas = Some(areas);
        self.coordinate_stale = true;
        Ok(())
    }

    /// Recomputes the series and rebuilds the coordinate matrix.
    pub fn on_data_changed(&mut self, chart: &StockChart) -> ChartResult<()> {
        self.series.on_data_changed(chart.candles());
        self.seen_generation = Some(chart.data_generation());
        self.coordinate_stale = true;
        self.prepare(chart)
    }

    pub fn on_pointer_move(&mut self, pointer: Point) {
        self.interaction.on_pointer_move(pointer);
    }

    pub fn on_pointer_leave(&mut self) {
        self.interaction.on_pointer_leave();
    }

    /// Resolves the data point under `pixel` with this frame's matrices.
    ///
    /// `None` for an empty data set, a singular transform, or a pixel
    /// outside the data.
    pub fn highlight_at(&mut self, chart: &StockChart, pixel: Point) -> Option<Highlight> {
        let mapper = self.frame_mapper(chart).ok()??;
        resolve_highlight(&mapper, pixel, chart.data_count())
    }

    /// Rebuilds the per-frame corrections and hands one frame to `renderer`.
    ///
    /// Nothing is rendered before the first resize or while the data set is
    /// empty.
    pub fn draw<R: Renderer>(&mut self, chart: &StockChart, renderer: &mut R) -> ChartResult<()> {
        let (Some(mapper), Some(viewport), Some(areas), Some(window)) = (
            self.frame_mapper(chart)?,
            self.viewport,
            self.areas,
            chart.visible_window(),
        ) else {
            trace!("panel has nothing to draw");
            return Ok(());
        };

        let highlight = self
            .interaction
            .pointer()
            .and_then(|pointer| resolve_highlight(&mapper, pointer, chart.data_count()));
        let ctx = PanelDrawContext {
            mapper,
            areas,
            window,
            candles: chart.candles(),
            config: chart.config(),
            highlight,
        };

        let mut frame = RenderFrame::new(viewport);
        self.series.build(&ctx, &mut frame)?;
        if let Some(highlight) = highlight {
            push_highlight_lines(&ctx, highlight, &mut frame);
        }
        renderer.render(&frame)
    }

    /// Brings the pipeline up to date and composes this frame's mapper.
    fn frame_mapper(&mut self, chart: &StockChart) -> ChartResult<Option<ComposedMapper>> {
        if self.seen_generation != Some(chart.data_generation()) {
            self.on_data_changed(chart)?;
        } else if self.coordinate_stale {
            self.prepare(chart)?;
        }
        let Some(areas) = self.areas else {
            return Ok(None);
        };
        if !self.pipeline.is_prepared() {
            return Ok(None);
        }

        let series = &self.series;
        let values = |window: IndexWindow| series.value_range(window);
        let external = chart.external_transforms();
        self.pipeline.rebuild_frame(FrameInputs {
            external,
            main: areas.main(),
            data_count: chart.data_count(),
            snap_enabled: !chart.config().scroll_smoothly,
            values: &values,
        })?;
        self.pipeline.mapper(external).map(Some)
    }

    fn prepare(&mut self, chart: &StockChart) -> ChartResult<()> {
        let Some(areas) = self.areas else {
            return Ok(());
        };
        let series = &self.series;
        let values = |window: IndexWindow| series.value_range(window);
        self.pipeline.prepare(chart.visible_window(), areas, &values)?;
        self.coordinate_stale = false;
        Ok(())
    }
}

fn push_highlight_lines(ctx: &PanelDrawContext<'_>, highlight: Highlight, frame: &mut RenderFrame) {
    let full = ctx.areas.full();
    let config = ctx.config;

    if config.show_highlight_horizontal_line && full.contains_y(highlight.y) {
        let style = config.highlight_horizontal_line;
        frame.push_line(LinePrimitive::new(
            full.left,
            highlight.y,
            full.right,
            highlight.y,
            style.width,
            style.color,
        ));
    }

    if config.show_highlight_vertical_line && full.contains_x(highlight.x) {
        let style = config.highlight_vertical_line;
        let x = ctx.map(highlight.index_center_x(), 0.0).x;
        frame.push_line(LinePrimitive::new(
            x,
            full.top,
            x,
            full.bottom,
            style.width,
            style.color,
        ));
    }
}

/// Top edge of each panel when stacked vertically, margins included.
#[must_use]
pub fn stack_panel_tops(configs: &[PanelConfig]) -> Vec<f64> {
    configs
        .iter()
        .scan(0.0, |cursor, config| {
            let top = *cursor + config.margin_top;
            *cursor = top + config.height + config.margin_bottom;
            Some(top)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::stack_panel_tops;
    use crate::api::PanelConfig;

    #[test]
    fn panels_stack_with_margins() {
        let configs = [
            PanelConfig::default().with_height(300.0),
            PanelConfig {
                margin_top: 10.0,
                margin_bottom: 5.0,
                ..PanelConfig::default().with_height(100.0)
            },
            PanelConfig::default().with_height(80.0),
        ];
        assert_eq!(stack_panel_tops(&configs), vec![0.0, 310.0, 415.0]);
    }
}

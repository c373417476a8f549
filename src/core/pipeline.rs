use tracing::{debug, warn};

use crate::core::affine::AffineTransform;
use crate::core::autofit::{AutoFitCorrection, compute_fix_y};
use crate::core::coordinate::build_coordinate_matrix;
use crate::core::display_area::{DisplayArea, PanelAreas};
use crate::core::external::ExternalTransforms;
use crate::core::geometry::{Path, Point, Rect};
use crate::core::logical_range::{IndexWindow, ValueRangeProvider};
use crate::core::snap::{SnapCorrection, compute_fix_x};
use crate::error::{ChartError, ChartResult};

/// Per-frame inputs read from chart-level state.
#[derive(Clone, Copy)]
pub struct FrameInputs<'a> {
    pub external: &'a ExternalTransforms,
    pub main: DisplayArea,
    pub data_count: usize,
    pub snap_enabled: bool,
    pub values: &'a dyn ValueRangeProvider,
}

/// Every stage of one frame, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub coordinate: AffineTransform,
    pub fix_x: SnapCorrection,
    pub fix_y: AutoFitCorrection,
}

impl FrameMatrices {
    /// Coordinate matrix with no per-frame corrections yet.
    #[must_use]
    pub fn uncorrected(coordinate: AffineTransform) -> Self {
        Self {
            coordinate,
            fix_x: SnapCorrection::none(),
            fix_y: AutoFitCorrection::none(),
        }
    }

    /// Concatenates coordinate, external x transforms, fix-x and fix-y.
    #[must_use]
    pub fn compose(&self, external: &ExternalTransforms) -> ComposedMapper {
        ComposedMapper::new(
            self.coordinate
                .then(external.x_chain())
                .then(self.fix_x.matrix)
                .then(self.fix_y.matrix),
        )
    }
}

/// Runs fix-x then fix-y on top of a finalized coordinate matrix.
///
/// Pure: identical inputs produce bit-identical matrices.
#[must_use]
pub fn rebuild_frame(coordinate: AffineTransform, inputs: FrameInputs<'_>) -> FrameMatrices {
    let fix_x = compute_fix_x(
        coordinate,
        inputs.external,
        inputs.main,
        inputs.data_count,
        inputs.snap_enabled,
    );
    let fix_y = compute_fix_y(
        coordinate,
        inputs.external,
        fix_x.matrix,
        inputs.main,
        inputs.data_count,
        inputs.values,
    );
    FrameMatrices {
        coordinate,
        fix_x,
        fix_y,
    }
}

/// Forward (logical to pixel) and inverse mapping through one composed matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposedMapper {
    matrix: AffineTransform,
}

impl ComposedMapper {
    #[must_use]
    pub fn new(matrix: AffineTransform) -> Self {
        Self { matrix }
    }

    #[must_use]
    pub fn matrix(&self) -> AffineTransform {
        self.matrix
    }

    #[must_use]
    pub fn forward_point(&self, point: Point) -> Point {
        self.matrix.map_point(point)
    }

    #[must_use]
    pub fn forward_points(&self, points: &[Point]) -> Vec<Point> {
        self.matrix.map_points(points)
    }

    #[must_use]
    pub fn forward_rect(&self, rect: Rect) -> Rect {
        self.matrix.map_rect(rect)
    }

    #[must_use]
    pub fn forward_path(&self, path: &Path) -> Path {
        self.matrix.map_path(path)
    }

    pub fn inverse_point(&self, point: Point) -> ChartResult<Point> {
        Ok(self.inverse()?.map_point(point))
    }

    pub fn inverse_rect(&self, rect: Rect) -> ChartResult<Rect> {
        Ok(self.inverse()?.map_rect(rect))
    }

    pub fn inverse_path(&self, path: &Path) -> ChartResult<Path> {
        Ok(self.inverse()?.map_path(path))
    }

    fn inverse(&self) -> ChartResult<AffineTransform> {
        self.matrix.invert().ok_or_else(|| {
            warn!("composed matrix is singular, no inverse mapping available");
            ChartError::SingularTransform
        })
    }
}

/// Transform state owned by one panel.
///
/// The coordinate matrix is rebuilt on resize or data change. Fix-x and fix-y
/// are rebuilt every frame, and the composed matrix is re-derived on every
/// mapping call because the external transforms may change between calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformPipeline {
    frame: Option<FrameMatrices>,
}

impl TransformPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the coordinate matrix for `window`.
    ///
    /// `None` (empty data set) clears the pipeline; later mapping calls report
    /// [`ChartError::PipelineNotPrepared`].
    pub fn prepare(
        &mut self,
        window: Option<IndexWindow>,
        areas: PanelAreas,
        values: &dyn ValueRangeProvider,
    ) -> ChartResult<()> {
        let Some(window) = window else {
            debug!("empty data set, transform pipeline cleared");
            self.frame = None;
            return Ok(());
        };
        let coordinate = build_coordinate_matrix(window, areas, values)?;
        self.frame = Some(FrameMatrices::uncorrected(coordinate));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.frame = None;
    }

    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.frame.is_some()
    }

    /// The finalized coordinate matrix, read-only.
    #[must_use]
    pub fn coordinate_matrix(&self) -> Option<AffineTransform> {
        self.frame.map(|frame| frame.coordinate)
    }

    /// Matrices of the last rebuilt frame.
    #[must_use]
    pub fn frame(&self) -> Option<&FrameMatrices> {
        self.frame.as_ref()
    }

    /// Recomputes fix-x and fix-y for the current chart state.
    pub fn rebuild_frame(&mut self, inputs: FrameInputs<'_>) -> ChartResult<&FrameMatrices> {
        let coordinate = self
            .coordinate_matrix()
            .ok_or(ChartError::PipelineNotPrepared)?;
        let frame = self.frame.insert(rebuild_frame(coordinate, inputs));
        Ok(frame)
    }

    /// Freshly composed mapper for the given external transforms.
    pub fn mapper(&self, external: &ExternalTransforms) -> ChartResult<ComposedMapper> {
        self.frame
            .as_ref()
            .map(|frame| frame.compose(external))
            .ok_or(ChartError::PipelineNotPrepared)
    }

    pub fn forward_point(&self, external: &ExternalTransforms, point: Point) -> ChartResult<Point> {
        Ok(self.mapper(external)?.forward_point(point))
    }

    pub fn forward_rect(&self, external: &ExternalTransforms, rect: Rect) -> ChartResult<Rect> {
        Ok(self.mapper(external)?.forward_rect(rect))
    }

    pub fn forward_path(&self, external: &ExternalTransforms, path: &Path) -> ChartResult<Path> {
        Ok(self.mapper(external)?.forward_path(path))
    }

    pub fn inverse_point(&self, external: &ExternalTransforms, point: Point) -> ChartResult<Point> {
        self.mapper(external)?.inverse_point(point)
    }

    pub fn inverse_rect(&self, external: &ExternalTransforms, rect: Rect) -> ChartResult<Rect> {
        self.mapper(external)?.inverse_rect(rect)
    }

    pub fn inverse_path(&self, external: &ExternalTransforms, path: &Path) -> ChartResult<Path> {
        self.mapper(external)?.inverse_path(path)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{FrameInputs, TransformPipeline};
    use crate::core::affine::AffineTransform;
    use crate::core::display_area::{PanelAreas, PanelInsets};
    use crate::core::external::ExternalTransforms;
    use crate::core::geometry::Point;
    use crate::core::logical_range::{IndexWindow, LogicalRange};
    use crate::error::ChartError;

    fn areas() -> PanelAreas {
        PanelAreas::layout(400.0, 300.0, PanelInsets::default().with_main_padding(20.0, 20.0))
            .expect("layout")
    }

    fn range(_: IndexWindow) -> LogicalRange {
        LogicalRange::new(10.0, 20.0)
    }

    #[test]
    fn unprepared_pipeline_reports_not_prepared() {
        let pipeline = TransformPipeline::new();
        let err = pipeline
            .forward_point(&ExternalTransforms::default(), Point::new(0.0, 0.0))
            .expect_err("no matrix yet");
        assert_eq!(err, ChartError::PipelineNotPrepared);
    }

    #[test]
    fn empty_window_clears_previous_matrix() {
        let mut pipeline = TransformPipeline::new();
        pipeline
            .prepare(Some(IndexWindow::new(0, 9).expect("window")), areas(), &range)
            .expect("prepare");
        assert!(pipeline.is_prepared());

        pipeline.prepare(None, areas(), &range).expect("prepare empty");
        assert!(!pipeline.is_prepared());
        assert!(pipeline.coordinate_matrix().is_none());
    }

    #[test]
    fn frame_rebuild_then_forward_matches_fill_scenario() {
        let mut pipeline = TransformPipeline::new();
        pipeline
            .prepare(Some(IndexWindow::new(0, 9).expect("window")), areas(), &range)
            .expect("prepare");

        let external = ExternalTransforms::default();
        pipeline
            .rebuild_frame(FrameInputs {
                external: &external,
                main: areas().main(),
                data_count: 10,
                snap_enabled: true,
                values: &range,
            })
            .expect("frame");

        let low = pipeline
            .forward_point(&external, Point::new(0.0, 10.0))
            .expect("forward");
        assert_abs_diff_eq!(low.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(low.y, 280.0, epsilon = 1e-9);

        let high = pipeline
            .forward_point(&external, Point::new(10.0, 20.0))
            .expect("forward");
        assert_abs_diff_eq!(high.x, 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(high.y, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn collapsed_zoom_makes_inverse_unavailable() {
        let mut pipeline = TransformPipeline::new();
        pipeline
            .prepare(Some(IndexWindow::new(0, 9).expect("window")), areas(), &range)
            .expect("prepare");
        let external = ExternalTransforms {
            x_scale: AffineTransform::scale(0.0, 1.0),
            ..ExternalTransforms::default()
        };
        let err = pipeline
            .inverse_point(&external, Point::new(10.0, 10.0))
            .expect_err("singular");
        assert_eq!(err, ChartError::SingularTransform);
    }
}

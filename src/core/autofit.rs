use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::affine::AffineTransform;
use crate::core::display_area::DisplayArea;
use crate::core::external::ExternalTransforms;
use crate::core::geometry::Point;
use crate::core::logical_range::{IndexWindow, LogicalRange, ValueRangeProvider};
use crate::core::snap::recover_index;

/// Vertical correction that stretches the visible values over the main area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoFitCorrection {
    /// Translate + vertical scale, identity when nothing can be fitted.
    pub matrix: AffineTransform,
    /// Index window actually on screen after every x transform.
    pub visible: Option<IndexWindow>,
    /// Value range of `visible`.
    pub value_range: Option<LogicalRange>,
}

impl AutoFitCorrection {
    #[must_use]
    pub fn none() -> Self {
        Self {
            matrix: AffineTransform::identity(),
            visible: None,
            value_range: None,
        }
    }
}

/// Computes the fix-y correction for the current frame.
///
/// The visible window is recovered from the main area's pixel edges through
/// the inverted x chain (coordinate, external transforms, fix-x), never taken
/// from the requested window, so pans and zooms are accounted for. A left edge
/// outside the data clamps to `0`, a right edge to `data_count - 1`.
///
/// A flat visible range leaves the matrix at identity.
#[must_use]
pub fn compute_fix_y(
    coordinate: AffineTransform,
    external: &ExternalTransforms,
    fix_x: AffineTransform,
    main: DisplayArea,
    data_count: usize,
    values: &dyn ValueRangeProvider,
) -> AutoFitCorrection {
    let Some(last_index) = data_count.checked_sub(1) else {
        return AutoFitCorrection::none();
    };

    let chain = coordinate.then(external.x_chain()).then(fix_x);
    let Some(inverse) = chain.invert() else {
        warn!("x transform chain is singular, skipping auto-fit");
        return AutoFitCorrection::none();
    };

    let left_logical = inverse.map_point(Point::new(main.left, 0.0)).x;
    let right_logical = inverse.map_point(Point::new(main.right, 0.0)).x;
    let visible = IndexWindow::spanning(
        recover_index(left_logical, data_count, 0),
        recover_index(right_logical, data_count, last_index),
    );

    let value_range = values.value_range(visible);
    let from_y = chain.map_point(Point::new(0.0, value_range.from)).y;
    let to_y = chain.map_point(Point::new(0.0, value_range.to)).y;
    let (min_y, max_y) = if to_y > from_y {
        (from_y, to_y)
    } else {
        (to_y, from_y)
    };

    let matrix = if min_y != max_y && min_y.is_finite() && max_y.is_finite() {
        let sy = main.height() / (max_y - min_y);
        trace!(
            start = visible.start(),
            end = visible.end(),
            min_y,
            max_y,
            sy,
            "computed auto-fit correction"
        );
        AffineTransform::translation(0.0, main.top - min_y).post_scale(1.0, sy, 0.0, main.top)
    } else {
        trace!(
            start = visible.start(),
            end = visible.end(),
            "flat visible range, auto-fit left at identity"
        );
        AffineTransform::identity()
    };

    AutoFitCorrection {
        matrix,
        visible: Some(visible),
        value_range: Some(value_range),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::compute_fix_y;
    use crate::core::affine::AffineTransform;
    use crate::core::display_area::DisplayArea;
    use crate::core::external::ExternalTransforms;
    use crate::core::geometry::Point;
    use crate::core::logical_range::{IndexWindow, LogicalRange};

    fn main_area() -> DisplayArea {
        DisplayArea::new(0.0, 20.0, 400.0, 280.0).expect("area")
    }

    // Window [0, 9] fitted to values [0, 10]: 40px per point, 26px per value.
    fn coordinate() -> AffineTransform {
        AffineTransform::scale(40.0, -26.0).post_translate(0.0, 280.0)
    }

    // Value at index `i` is `i`, so the range of a window is its index span.
    fn ramp(window: IndexWindow) -> LogicalRange {
        LogicalRange::new(window.start() as f64, window.end() as f64)
    }

    #[test]
    fn scrolled_window_is_refitted_to_main_area() {
        // Scroll left by 5 points: indices 5..=9 visible, rest past data end.
        let external = ExternalTransforms {
            scroll: AffineTransform::translation(-200.0, 0.0),
            ..ExternalTransforms::default()
        };
        let fix = compute_fix_y(
            coordinate(),
            &external,
            AffineTransform::identity(),
            main_area(),
            10,
            &ramp,
        );

        assert_eq!(fix.visible, Some(IndexWindow::new(5, 9).expect("window")));
        let composed = coordinate().then(external.x_chain()).then(fix.matrix);
        assert_abs_diff_eq!(composed.map_point(Point::new(7.0, 9.0)).y, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(composed.map_point(Point::new(7.0, 5.0)).y, 280.0, epsilon = 1e-9);
    }

    #[test]
    fn left_edge_before_data_clamps_to_first_index() {
        let external = ExternalTransforms {
            scroll: AffineTransform::translation(120.0, 0.0),
            ..ExternalTransforms::default()
        };
        let fix = compute_fix_y(
            coordinate(),
            &external,
            AffineTransform::identity(),
            main_area(),
            10,
            &ramp,
        );
        assert_eq!(fix.visible, Some(IndexWindow::new(0, 7).expect("window")));
    }

    #[test]
    fn flat_visible_range_keeps_identity() {
        let flat = |_: IndexWindow| LogicalRange::new(4.0, 4.0);
        let fix = compute_fix_y(
            coordinate(),
            &ExternalTransforms::default(),
            AffineTransform::identity(),
            main_area(),
            10,
            &flat,
        );
        assert!(fix.matrix.is_identity());
    }

    #[test]
    fn repeated_computation_is_bit_identical() {
        let external = ExternalTransforms {
            x_scale: AffineTransform::scale_about(1.7, 1.0, 200.0, 0.0),
            scroll: AffineTransform::translation(-33.3, 0.0),
            ..ExternalTransforms::default()
        };
        let run = || {
            compute_fix_y(
                coordinate(),
                &external,
                AffineTransform::translation(3.1, 0.0),
                main_area(),
                10,
                &ramp,
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn empty_data_set_is_a_no_op() {
        let fix = compute_fix_y(
            coordinate(),
            &ExternalTransforms::default(),
            AffineTransform::identity(),
            main_area(),
            0,
            &ramp,
        );
        assert_eq!(fix.visible, None);
        assert!(fix.matrix.is_identity());
    }
}

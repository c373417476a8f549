use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::affine::AffineTransform;
use crate::core::display_area::DisplayArea;
use crate::core::external::ExternalTransforms;
use crate::core::geometry::Point;

/// Horizontal correction that parks scrolling on whole data points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapCorrection {
    /// Pure x translation.
    pub matrix: AffineTransform,
    /// Data index recovered at the main area's left edge.
    pub anchor_index: usize,
    /// Signed pixel length of one data point, negative when the x chain mirrors.
    pub unit_px: f64,
    /// Applied x shift, never more than half a data point either way.
    pub dx: f64,
}

impl SnapCorrection {
    #[must_use]
    pub fn none() -> Self {
        Self {
            matrix: AffineTransform::identity(),
            anchor_index: 0,
            unit_px: 0.0,
            dx: 0.0,
        }
    }
}

/// Rounds a recovered logical x to a data index.
///
/// Values that round outside `[0, data_count)` (or are not finite) resolve to
/// `fallback`.
#[must_use]
pub fn recover_index(logical_x: f64, data_count: usize, fallback: usize) -> usize {
    let rounded = logical_x.round_ties_even();
    if rounded.is_finite() && rounded >= 0.0 && rounded < data_count as f64 {
        rounded as usize
    } else {
        if data_count > 0 {
            warn!(
                logical_x,
                data_count, fallback, "recovered index out of range, clamping"
            );
        }
        fallback
    }
}

/// Computes the fix-x correction (discrete "one point per step" scrolling).
///
/// Smooth scrolling, an empty data set, a singular x chain or a zero-width
/// data point all yield [`SnapCorrection::none`]. Otherwise the returned
/// translation aligns the nearest index boundary with the main area's left
/// edge and never moves content by more than half a data point.
#[must_use]
pub fn compute_fix_x(
    coordinate: AffineTransform,
    external: &ExternalTransforms,
    main: DisplayArea,
    data_count: usize,
    snap_enabled: bool,
) -> SnapCorrection {
    if !snap_enabled || data_count == 0 {
        return SnapCorrection::none();
    }

    let chain = coordinate.then(external.x_chain());
    let Some(inverse) = chain.invert() else {
        warn!("x transform chain is singular, skipping snap");
        return SnapCorrection::none();
    };

    let left_logical = inverse.map_point(Point::new(main.left, 0.0)).x;
    let anchor_index = recover_index(left_logical, data_count, 0);

    let first = chain.map_point(Point::new(anchor_index as f64, 0.0)).x;
    let second = chain.map_point(Point::new(anchor_index as f64 + 1.0, 0.0)).x;
    let unit_px = second - first;
    if unit_px == 0.0 || !unit_px.is_finite() {
        return SnapCorrection {
            anchor_index,
            ..SnapCorrection::none()
        };
    }

    // Boundaries repeat every |unit| whichever way the axis runs.
    let step = unit_px.abs();
    let offset = (first - main.left).rem_euclid(step);
    let dx = if offset <= step / 2.0 {
        -offset
    } else {
        step - offset
    };

    trace!(anchor_index, unit_px, dx, "computed snap correction");
    SnapCorrection {
        matrix: AffineTransform::translation(dx, 0.0),
        anchor_index,
        unit_px,
        dx,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{compute_fix_x, recover_index};
    use crate::core::affine::AffineTransform;
    use crate::core::display_area::DisplayArea;
    use crate::core::external::ExternalTransforms;
    use crate::core::geometry::Point;

    fn main_area() -> DisplayArea {
        DisplayArea::new(0.0, 20.0, 400.0, 280.0).expect("area")
    }

    // 40px per data point, index 0 at x = 0.
    fn coordinate() -> AffineTransform {
        AffineTransform::scale(40.0, -26.0).post_translate(0.0, 540.0)
    }

    fn scrolled(dx: f64) -> ExternalTransforms {
        ExternalTransforms {
            scroll: AffineTransform::translation(dx, 0.0),
            ..ExternalTransforms::default()
        }
    }

    #[test]
    fn recover_index_rounds_and_clamps() {
        assert_eq!(recover_index(2.4, 10, 0), 2);
        assert_eq!(recover_index(2.6, 10, 0), 3);
        assert_eq!(recover_index(-3.0, 10, 0), 0);
        assert_eq!(recover_index(12.0, 10, 9), 9);
        assert_eq!(recover_index(f64::NAN, 10, 9), 9);
    }

    #[test]
    fn smooth_scrolling_disables_snap() {
        let fix = compute_fix_x(coordinate(), &scrolled(-13.0), main_area(), 20, false);
        assert!(fix.matrix.is_identity());
    }

    #[test]
    fn small_offset_snaps_back_to_near_boundary() {
        // Boundaries sit at 10 + 40k; nearest to the left edge is 10.
        let fix = compute_fix_x(coordinate(), &scrolled(10.0), main_area(), 20, true);
        assert_abs_diff_eq!(fix.dx, -10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fix.unit_px, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn large_offset_snaps_forward_to_far_boundary() {
        // Scrolled left by 13px: boundaries at 27 + 40k, nearest is -13.
        let fix = compute_fix_x(coordinate(), &scrolled(-13.0), main_area(), 20, true);
        assert_abs_diff_eq!(fix.dx, 13.0, epsilon = 1e-9);
        assert_eq!(fix.anchor_index, 0);
    }

    #[test]
    fn scrolled_before_first_point_clamps_anchor_to_zero() {
        let fix = compute_fix_x(coordinate(), &scrolled(120.0), main_area(), 10, true);
        assert_eq!(fix.anchor_index, 0);
        assert_abs_diff_eq!(fix.dx, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn mirrored_zoom_keeps_signed_unit_and_snaps_to_nearest_boundary() {
        // Index i lands at 400 + shift - 40i once mirrored about x = 200.
        let mirrored = |shift: f64| ExternalTransforms {
            x_scale: AffineTransform::scale_about(-1.0, 1.0, 200.0, 0.0),
            scroll: AffineTransform::translation(shift, 0.0),
            ..ExternalTransforms::default()
        };

        let near = compute_fix_x(coordinate(), &mirrored(13.0), main_area(), 20, true);
        assert_eq!(near.anchor_index, 10);
        assert_abs_diff_eq!(near.unit_px, -40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(near.dx, -13.0, epsilon = 1e-9);

        let far = compute_fix_x(coordinate(), &mirrored(30.0), main_area(), 20, true);
        assert_eq!(far.anchor_index, 11);
        assert_abs_diff_eq!(far.unit_px, -40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(far.dx, 10.0, epsilon = 1e-9);

        for (shift, fix) in [(13.0, near), (30.0, far)] {
            let chain = coordinate().then(mirrored(shift).x_chain()).then(fix.matrix);
            let boundary = chain.map_point(Point::new(fix.anchor_index as f64, 0.0)).x;
            assert_abs_diff_eq!(boundary, main_area().left, epsilon = 1e-9);
        }
    }

    #[test]
    fn collapsed_zoom_produces_identity() {
        let external = ExternalTransforms {
            x_scale: AffineTransform::scale(0.0, 1.0),
            ..ExternalTransforms::default()
        };
        let fix = compute_fix_x(coordinate(), &external, main_area(), 10, true);
        assert!(fix.matrix.is_identity());
    }
}

use tracing::{debug, warn};

use crate::core::affine::AffineTransform;
use crate::core::display_area::PanelAreas;
use crate::core::logical_range::{IndexWindow, ValueRangeProvider, x_logical_range};
use crate::error::{ChartError, ChartResult};

/// Builds the coordinate matrix of a panel.
///
/// The result maps the logical window (`[start, end + 1)` on x, the panel's
/// value range on y) onto the main display area with the y axis flipped, so
/// larger values sit higher on screen. It depends only on the window, the
/// layout and the data, so callers rebuild it on resize or data change, not
/// per frame.
///
/// When every value in the window is equal the y range is degenerate: no
/// vertical scaling is applied and the values are centered on the full
/// display area instead.
pub fn build_coordinate_matrix(
    window: IndexWindow,
    areas: PanelAreas,
    values: &dyn ValueRangeProvider,
) -> ChartResult<AffineTransform> {
    let main = areas.main();
    let x_range = x_logical_range(window);
    let y_range = values.value_range(window);
    if !y_range.is_finite() {
        return Err(ChartError::InvalidData(
            "panel value range must be finite".to_owned(),
        ));
    }

    let degenerate = y_range.is_degenerate();
    let translate_y = if degenerate {
        warn!(
            value = y_range.from,
            start = window.start(),
            end = window.end(),
            "flat value range, centering panel content"
        );
        // Lands on the full area's center once the flip and re-anchor below
        // are applied.
        main.top + main.bottom - areas.full().center_y() - y_range.from
    } else {
        main.top - y_range.from
    };

    let sx = main.width() / x_range.len();
    let sy = if degenerate {
        1.0
    } else {
        main.height() / y_range.len()
    };

    let matrix = AffineTransform::translation(main.left - x_range.from, translate_y)
        .post_scale(sx, -sy, main.left, main.top)
        .post_translate(0.0, main.height());

    debug!(
        start = window.start(),
        end = window.end(),
        y_from = y_range.from,
        y_to = y_range.to,
        sx,
        sy,
        "rebuilt coordinate matrix"
    );
    Ok(matrix)
}

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ComposedMapper, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Long-press crosshair is shown.
    Highlighting,
}

/// Crosshair target resolved from a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// Pointer position in panel pixels.
    pub x: f64,
    pub y: f64,
    /// Pointer position in logical coordinates.
    pub value_x: f64,
    pub value_y: f64,
    /// Data index under the pointer.
    pub index: usize,
}

impl Highlight {
    /// Logical x of the center of the highlighted data point.
    #[must_use]
    pub fn index_center_x(self) -> f64 {
        self.index as f64 + 0.5
    }
}

/// Hit-tests a pixel position against the panel's composed transform.
///
/// Returns `None` when the inverse is unavailable (singular transform) or the
/// pointer is outside the data; both mean "nothing to highlight".
#[must_use]
pub fn resolve_highlight(
    mapper: &ComposedMapper,
    pointer: Point,
    data_count: usize,
) -> Option<Highlight> {
    let logical = mapper.inverse_point(pointer).ok()?;
    let slot = logical.x.floor();
    if !slot.is_finite() || slot < 0.0 || slot >= data_count as f64 {
        trace!(value_x = logical.x, data_count, "pointer outside data");
        return None;
    }

    Some(Highlight {
        x: pointer.x,
        y: pointer.y,
        value_x: logical.x,
        value_y: logical.y,
        index: slot as usize,
    })
}

/// Pointer state of one panel, fed by the host's gesture handling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    mode: InteractionMode,
    pointer: Option<Point>,
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn pointer(self) -> Option<Point> {
        self.pointer
    }

    pub fn on_pointer_move(&mut self, pointer: Point) {
        self.mode = InteractionMode::Highlighting;
        self.pointer = Some(pointer);
    }

    pub fn on_pointer_leave(&mut self) {
        self.mode = InteractionMode::Idle;
        self.pointer = None;
    }
}

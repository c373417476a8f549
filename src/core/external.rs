use serde::{Deserialize, Serialize};

use crate::core::affine::AffineTransform;

/// Chart-level x-axis transforms shared by every panel.
///
/// Gesture handling mutates these between frames; the transform pipeline only
/// reads them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalTransforms {
    /// User-driven zoom.
    pub x_scale: AffineTransform,
    /// Secondary correction applied after the zoom.
    pub fix_x_scale: AffineTransform,
    /// Pan offset.
    pub scroll: AffineTransform,
}

impl ExternalTransforms {
    #[must_use]
    pub fn new(x_scale: AffineTransform, fix_x_scale: AffineTransform, scroll: AffineTransform) -> Self {
        Self {
            x_scale,
            fix_x_scale,
            scroll,
        }
    }

    /// `x_scale`, then `fix_x_scale`, then `scroll`.
    #[must_use]
    pub fn x_chain(&self) -> AffineTransform {
        self.x_scale.then(self.fix_x_scale).then(self.scroll)
    }
}

mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{CirclePrimitive, Color, LinePrimitive, RectPrimitive};

use crate::error::ChartResult;

/// Contract implemented by any drawing backend.
///
/// Panels hand over a fully mapped frame in pixel space, so backends never
/// see logical coordinates or transforms.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

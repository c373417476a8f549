pub mod affine;
pub mod autofit;
pub mod candle;
pub mod coordinate;
pub mod display_area;
pub mod external;
pub mod geometry;
pub mod indicator;
pub mod logical_range;
pub mod pipeline;
pub mod snap;
pub mod types;

pub use affine::AffineTransform;
pub use autofit::{AutoFitCorrection, compute_fix_y};
pub use candle::OhlcBar;
pub use coordinate::build_coordinate_matrix;
pub use display_area::{DisplayArea, PanelAreas, PanelInsets};
pub use external::ExternalTransforms;
pub use geometry::{Path, PathCommand, Point, Rect};
pub use indicator::{IndicatorCalculator, IndicatorSeries};
pub use logical_range::{IndexWindow, LogicalRange, ValueRangeProvider, X_UNIT_LEN, x_logical_range};
pub use pipeline::{ComposedMapper, FrameInputs, FrameMatrices, TransformPipeline, rebuild_frame};
pub use snap::{SnapCorrection, compute_fix_x, recover_index};
pub use types::Viewport;

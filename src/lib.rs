//! stock-chart: coordinate transform engine for stacked stock chart panels.
//!
//! Each panel maps logical coordinates (x = data index, y = value) to pixels
//! through a coordinate matrix, the chart-wide scale and scroll matrices, and
//! two per-frame corrections: fix-x snaps the first visible point to the
//! panel's left edge and fix-y refits the visible values to the main area.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartPanel, PanelConfig, PanelSeries, StockChart, StockChartConfig};
pub use core::{AffineTransform, ComposedMapper, TransformPipeline};
pub use error::{ChartError, ChartResult};

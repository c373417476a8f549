mod average_price_series;
mod chart_config;
mod kdj_series;
mod macd_series;
mod panel;
mod stock_chart;

pub use average_price_series::{AveragePriceSeries, AveragePriceStyle};
pub use chart_config::{LineStyle, PanelConfig, StockChartConfig};
pub use kdj_series::{KdjSeries, KdjStyle};
pub use macd_series::{MacdSeries, MacdStyle};
pub use panel::{ChartPanel, PanelDrawContext, PanelSeries, stack_panel_tops};
pub use stock_chart::StockChart;

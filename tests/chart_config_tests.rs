use stock_chart::api::{MacdStyle, PanelConfig, StockChart, StockChartConfig};
use stock_chart::core::{IndexWindow, PanelAreas};
use stock_chart::render::Color;

#[test]
fn chart_config_json_drives_visible_window() {
    let config = StockChartConfig::from_json_str(
        r#"{
            "show_start_index": 3,
            "show_end_index": 12,
            "scroll_smoothly": true,
            "rise_color": { "red": 1.0, "green": 0.0, "blue": 0.0, "alpha": 1.0 }
        }"#,
    )
    .expect("parse");
    assert!(config.scroll_smoothly);
    assert_eq!(config.rise_color, Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(config.show_window().expect("window"), IndexWindow::new(3, 12).expect("window"));

    let chart = StockChart::new(config).expect("chart");
    assert_eq!(chart.visible_window(), None);
}

#[test]
fn invalid_color_in_json_is_rejected() {
    let result = StockChartConfig::from_json_str(
        r#"{ "down_color": { "red": 2.0, "green": 0.0, "blue": 0.0, "alpha": 1.0 } }"#,
    );
    assert!(result.is_err());
}

#[test]
fn panel_config_insets_reserve_header_space() {
    let mut config = PanelConfig::default().with_main_padding(8.0, 4.0);
    config.insets.display_top = Some(30.0);
    let config = config.validate().expect("valid");

    let areas = PanelAreas::layout(320.0, config.height, config.insets).expect("layout");
    assert_eq!(areas.full().top, 30.0);
    assert_eq!(areas.full().bottom, 200.0);
    assert_eq!(areas.main().top, 38.0);
    assert_eq!(areas.main().bottom, 196.0);
}

#[test]
fn panel_config_round_trips_through_json() {
    let config = PanelConfig::default().with_height(120.0).with_main_padding(12.0, 6.0);
    let json = serde_json::to_string(&config).expect("serialize");
    let parsed: PanelConfig = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn macd_bar_space_ratio_must_leave_room_for_bars() {
    let style = MacdStyle {
        bar_space_ratio: 1.0,
        ..MacdStyle::default()
    };
    assert!(style.validate().is_err());
    assert!(MacdStyle::default().validate().is_ok());
}

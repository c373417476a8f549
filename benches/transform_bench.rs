use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use stock_chart::api::{
    AveragePriceSeries, AveragePriceStyle, ChartPanel, PanelConfig, StockChart, StockChartConfig,
};
use stock_chart::core::{
    AffineTransform, ExternalTransforms, FrameInputs, IndexWindow, LogicalRange, OhlcBar,
    PanelAreas, PanelInsets, Point, build_coordinate_matrix, rebuild_frame,
};
use stock_chart::render::NullRenderer;

fn generated_bars(count: usize) -> Vec<OhlcBar> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            let base = 100.0 + t * 0.05;
            let open = base;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            let low = open.min(close) - 0.75;
            let high = open.max(close) + 0.75;
            OhlcBar::new(t, open, high, low, close).expect("valid generated bar")
        })
        .collect()
}

fn value_range(window: IndexWindow) -> LogicalRange {
    LogicalRange::new(window.start() as f64, window.end() as f64 * 1.5 + 10.0)
}

fn bench_frame_rebuild(c: &mut Criterion) {
    let areas = PanelAreas::layout(1920.0, 600.0, PanelInsets::default().with_main_padding(20.0, 20.0))
        .expect("layout");
    let window = IndexWindow::new(0, 59).expect("window");
    let coordinate = build_coordinate_matrix(window, areas, &value_range).expect("matrix");
    let external = ExternalTransforms {
        x_scale: AffineTransform::scale_about(1.7, 1.0, 960.0, 0.0),
        scroll: AffineTransform::translation(-1_234.5, 0.0),
        ..ExternalTransforms::default()
    };

    c.bench_function("frame_rebuild", |b| {
        b.iter(|| {
            let frame = rebuild_frame(
                black_box(coordinate),
                FrameInputs {
                    external: black_box(&external),
                    main: areas.main(),
                    data_count: 10_000,
                    snap_enabled: true,
                    values: &value_range,
                },
            );
            black_box(frame.compose(&external))
        })
    });
}

fn bench_map_points_10k(c: &mut Criterion) {
    let matrix = AffineTransform::scale(32.0, -4.0)
        .post_translate(-812.0, 640.0)
        .then(AffineTransform::scale_about(1.2, 1.0, 960.0, 0.0));
    let points: Vec<Point> = (0..10_000)
        .map(|i| Point::new(i as f64 + 0.5, 100.0 + (i as f64 * 0.01).sin()))
        .collect();

    c.bench_function("map_points_10k", |b| {
        b.iter(|| black_box(matrix.map_points(black_box(&points))))
    });
}

fn bench_panel_draw_2k(c: &mut Criterion) {
    let mut chart = StockChart::new(StockChartConfig::new(0, 119)).expect("chart");
    chart.set_candles(generated_bars(2_000));
    chart.scroll_by(-3_000.0).expect("scroll");

    let series = AveragePriceSeries::new(AveragePriceStyle::default()).expect("series");
    let mut panel = ChartPanel::new(series, PanelConfig::default()).expect("panel");
    panel.on_size_changed(1600, 400).expect("resize");
    let mut renderer = NullRenderer::default();

    c.bench_function("panel_draw_2k", |b| {
        b.iter(|| {
            panel
                .draw(black_box(&chart), &mut renderer)
                .expect("draw should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_frame_rebuild,
    bench_map_points_10k,
    bench_panel_draw_2k
);
criterion_main!(benches);

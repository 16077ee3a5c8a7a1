#[cfg(feature = "gpui")]
use std::time::Duration;

#[cfg(feature = "gpui")]
use gpui::{
    AppContext, Application, AsyncWindowContext, Bounds, Timer, WindowBounds, WindowOptions, px,
    size,
};

#[cfg(feature = "gpui")]
use gpui_livegraph::{
    AxisConfig, AxisId, Chart, ChartConfig, Color, LabelFormat, SeriesConfig, TableSource, Theme,
    gpui_backend::GpuiGraphView,
};

#[cfg(feature = "gpui")]
fn main() {
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(900.0), px(600.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let config = ChartConfig {
                y_axes: vec![
                    AxisConfig::new(),
                    AxisConfig::new().with_label_format(LabelFormat::SiPrefix),
                ],
                series: vec![
                    SeriesConfig::new(1, AxisId(0))
                        .with_color(Color::new(0.2, 0.8, 0.9, 1.0))
                        .with_width(2.0),
                    SeriesConfig::new(2, AxisId(1))
                        .with_color(Color::new(0.95, 0.55, 0.2, 1.0))
                        .with_width(1.5),
                ],
                theme: Theme::new(),
                ..ChartConfig::default()
            };
            let chart = match Chart::from_config(&config) {
                Ok(chart) => chart,
                Err(err) => {
                    eprintln!("invalid chart config: {err}");
                    Chart::new(2)
                }
            };

            let view = GpuiGraphView::new(TableSource::new(["t", "sensor", "pressure"]), chart);
            let graph_handle = view.handle();
            let view_handle = cx.new(|_| view);

            let view_for_task = view_handle.clone();
            window
                .spawn(cx, move |cx: &mut AsyncWindowContext| {
                    let mut cx = cx.clone();
                    async move {
                        let mut t = 0.0_f64;
                        loop {
                            Timer::after(Duration::from_millis(16)).await;
                            let samples = 20;
                            cx.update(|_, cx| {
                                view_for_task.update(cx, |_view, view_cx| {
                                    graph_handle.write(|table, chart| {
                                        let rows = (0..samples).map(|_| {
                                            t += 0.01;
                                            vec![t, t.sin(), 101_325.0 + 2_000.0 * (t * 0.3).cos()]
                                        });
                                        table.extend_rows(rows.collect::<Vec<_>>(), chart);
                                    });
                                    view_cx.notify();
                                });
                            })
                            .ok();
                        }
                    }
                })
                .detach();

            view_handle
        })
        .unwrap();
    });
}

#[cfg(not(feature = "gpui"))]
fn main() {
    eprintln!("Enable the gpui feature to run this example.");
}

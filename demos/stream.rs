use std::time::{Duration, Instant};

use gpui_livegraph::{
    AxisId, Chart, ChartConfig, MonospaceMeasurer, TableSource, UpdateStrategy,
};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "y_axes": [{}, { "label_format": "si_prefix" }],
    "series": [
        { "column": 1, "style": { "color": { "r": 0.2, "g": 0.82, "b": 0.95, "a": 1.0 }, "width": 2.0 } },
        { "column": 2, "axis": 1, "style": { "color": { "r": 0.95, "g": 0.64, "b": 0.28, "a": 1.0 }, "width": 1.5 } }
    ]
}"#;

fn main() -> gpui_livegraph::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let duration_secs: f64 = std::env::var("DURATION_SECS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3.0);

    let mut chart = Chart::from_config(&ChartConfig::from_json(CONFIG)?)?;
    let mut table = TableSource::new(["t", "sensor", "pressure"]);
    chart.attach_source(&table);
    debug_assert_eq!(chart.series_axis(2), Some(AxisId(1)));

    let start = Instant::now();
    let mut next_report = Instant::now();
    let mut rows = 0_usize;
    let mut counts = [0_usize; 4];

    while start.elapsed().as_secs_f64() < duration_secs {
        let t = rows as f64 * 0.01;
        let sensor = (t * 0.9).sin() + 0.2 * (t * 0.13).cos();
        let pressure = 101_325.0 + 2_000.0 * (t * 0.05).cos();
        table.push_row(vec![t, sensor, pressure], &mut chart);
        rows += 1;

        let frame = chart.render(&table, &MonospaceMeasurer);
        let slot = match frame.strategy {
            UpdateStrategy::None => 0,
            UpdateStrategy::Append => 1,
            UpdateStrategy::Refresh => 2,
            UpdateStrategy::Rebuild => 3,
        };
        counts[slot] += 1;

        // Drop the oldest rows once in a while to exercise the removal path.
        if rows % 2_000 == 0 {
            table.remove_rows(0, 499, &mut chart);
        }

        if next_report.elapsed() >= Duration::from_secs(1) {
            let x = chart.axes().x();
            println!(
                "rows: {:>7}  x: [{:.2}, {:.2}]  append: {}  refresh: {}  rebuild: {}",
                table.rows().len(),
                x.min(),
                x.max(),
                counts[1],
                counts[2],
                counts[3],
            );
            next_report = Instant::now();
        }

        std::thread::sleep(Duration::from_micros(200));
    }

    println!(
        "stream complete: {rows} rows, {} appends, {} refreshes, {} rebuilds",
        counts[1], counts[2], counts[3]
    );
    Ok(())
}

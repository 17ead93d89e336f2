//! This module renders the dashboard charts from a snapshot log.

use anyhow::{Context, Result};
use hydrovision_schemas::{
    config::SystemConfig,
    snapshot::{Metric, SensorSnapshot},
};
use plotters::prelude::*;
use std::path::Path;

const PRIMARY: RGBColor = RGBColor(107, 33, 168);
const SECONDARY: RGBColor = RGBColor(147, 51, 234);
const CYAN_600: RGBColor = RGBColor(6, 182, 212);
const AMBER: RGBColor = RGBColor(245, 158, 11);
const SUCCESS: RGBColor = RGBColor(34, 197, 94);
const DANGER: RGBColor = RGBColor(239, 68, 68);

/// An acceptable band drawn behind a metric's trace.
#[derive(Debug, Clone, Copy)]
pub struct TargetBand {
    pub target: f64,
    pub tolerance: f64,
}

/// Target bands for the metrics the scorer assesses.
pub fn target_band(config: &SystemConfig, metric: Metric) -> Option<TargetBand> {
    match metric {
        Metric::Ph => Some(TargetBand {
            target: config.ph.target,
            tolerance: config.ph.tolerance,
        }),
        Metric::Conductivity => Some(TargetBand {
            target: config.conductivity.target,
            tolerance: config.conductivity.tolerance,
        }),
        Metric::WaterTemperature => Some(TargetBand {
            target: config.temperature.optimal,
            tolerance: config.temperature.half_range(),
        }),
        _ => None,
    }
}

fn metric_color(metric: Metric) -> RGBColor {
    match metric {
        Metric::Ph => PRIMARY,
        Metric::Conductivity => SECONDARY,
        Metric::WaterTemperature => CYAN_600,
        Metric::AirTemperature | Metric::Humidity => AMBER,
        Metric::WaterLevel => BLUE,
        Metric::BatteryVoltage => GREEN,
    }
}

/// Parses a time-series CSV written by `TimeSeriesLogger`.
pub fn parse_log_file<P: AsRef<Path>>(log_path: P) -> Result<Vec<SensorSnapshot>> {
    let log_path = log_path.as_ref();
    let mut reader = csv::Reader::from_path(log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;
    let mut data = Vec::new();
    for result in reader.deserialize() {
        let record: SensorSnapshot =
            result.with_context(|| format!("Malformed record in {:?}", log_path))?;
        data.push(record);
    }
    Ok(data)
}

/// Renders the four real-time charts of the dashboard view.
pub fn generate_dashboard_plots(
    output_dir: &Path,
    log_path: &Path,
    config: &SystemConfig,
) -> Result<Vec<String>> {
    println!("[Plotting] Generating charts from sensor history...");
    let data = parse_log_file(log_path)?;

    if data.is_empty() {
        println!("[Plotting] Warning: No data to plot.");
        return Ok(Vec::new());
    }

    let metrics = [
        Metric::Ph,
        Metric::Conductivity,
        Metric::WaterTemperature,
        Metric::Humidity,
    ];
    let mut written = Vec::new();
    for (i, metric) in metrics.iter().enumerate() {
        let path = output_dir.join(format!("{}_{}.png", i + 1, metric.key()));
        plot_metric(&path, &data, *metric, target_band(config, *metric))?;
        written.push(path.display().to_string());
    }

    println!("[Plotting] Charts have been saved to '{}'.", output_dir.display());
    Ok(written)
}

/// Hours since the first point, used as the x coordinate of every chart.
fn hours_since_start(data: &[SensorSnapshot]) -> Vec<f64> {
    let start = match data.first() {
        Some(first) => first.timestamp,
        None => return Vec::new(),
    };
    data.iter()
        .map(|d| (d.timestamp - start).num_milliseconds() as f64 / 3_600_000.0)
        .collect()
}

fn value_range(values: impl Iterator<Item = f64>, band: Option<TargetBand>) -> (f64, f64) {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if let Some(band) = band {
        lo = lo.min(band.target - band.tolerance);
        hi = hi.max(band.target + band.tolerance);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.1).max(0.05);
    (lo - pad, hi + pad)
}

/// Draws one metric over time, with its target band when it has one.
fn plot_metric(
    path: &Path,
    data: &[SensorSnapshot],
    metric: Metric,
    band: Option<TargetBand>,
) -> Result<()> {
    let root = BitMapBackend::new(path, (1024, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let xs = hours_since_start(data);
    let max_x = xs.last().copied().unwrap_or(0.0).max(f64::EPSILON);
    let (y_min, y_max) = value_range(data.iter().map(|d| metric.value_of(d)), band);

    let mut chart = ChartBuilder::on(&root)
        .caption(metric.label(), ("sans-serif", 36).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max_x, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time (hours)")
        .y_desc(format!("{} ({})", metric.label(), metric.unit()))
        .draw()?;

    if let Some(band) = band {
        let low = band.target - band.tolerance;
        let high = band.target + band.tolerance;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, low), (max_x, high)],
            SUCCESS.mix(0.1).filled(),
        )))?;
        for limit in [low, high] {
            chart.draw_series(DashedLineSeries::new(
                vec![(0.0, limit), (max_x, limit)],
                5,
                5,
                DANGER.mix(0.3).into(),
            ))?;
        }
        chart
            .draw_series(DashedLineSeries::new(
                vec![(0.0, band.target), (max_x, band.target)],
                2,
                4,
                SUCCESS.mix(0.5).stroke_width(2),
            ))?
            .label("Target")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SUCCESS.filled()));
    }

    let color = metric_color(metric);
    chart
        .draw_series(LineSeries::new(
            xs.iter().zip(data).map(|(x, d)| (*x, metric.value_of(d))),
            color.stroke_width(3),
        ))?
        .label(metric.label())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Renders the 2x2 multi-metric comparison of the analytics view.
pub fn plot_multi_metric(output_dir: &Path, data: &[SensorSnapshot]) -> Result<String> {
    let path = output_dir.join("multi_metric.png");
    let root = BitMapBackend::new(&path, (1280, 960)).into_drawing_area();
    root.fill(&WHITE)?;

    let xs = hours_since_start(data);
    let max_x = xs.last().copied().unwrap_or(0.0).max(f64::EPSILON);
    let metrics = [
        Metric::Ph,
        Metric::Conductivity,
        Metric::WaterTemperature,
        Metric::AirTemperature,
    ];

    for (area, metric) in root.split_evenly((2, 2)).iter().zip(metrics) {
        let (y_min, y_max) = value_range(data.iter().map(|d| metric.value_of(d)), None);
        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{} ({})", metric.label(), metric.unit()),
                ("sans-serif", 24).into_font(),
            )
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..max_x, y_min..y_max)?;

        chart.configure_mesh().x_desc("Time (hours)").draw()?;
        chart.draw_series(LineSeries::new(
            xs.iter().zip(data).map(|(x, d)| (*x, metric.value_of(d))),
            metric_color(metric).stroke_width(2),
        ))?;
    }

    root.present()?;
    Ok(path.display().to_string())
}

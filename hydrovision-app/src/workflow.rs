use crate::config::TimeRange;
use crate::plotting;
use anyhow::{Context, Result};
use chrono::Duration;
use hydrovision_core::{
    analysis::{summarize, HealthScorer},
    logger::TimeSeriesLogger,
    simulation::{GeneratorBuilder, ReadingGenerator},
};
use hydrovision_schemas::{
    config::SystemConfig,
    health::{HealthAssessment, MetricAssessment},
    snapshot::{Metric, SensorSnapshot},
};
use serde::Serialize;
use std::{fs, path::Path, thread, time};

/// Window of the real-time charts on the dashboard view.
const DASHBOARD_HISTORY_HOURS: i64 = 6;
const DASHBOARD_HISTORY_POINTS: usize = 72;

/// Everything the dashboard view shows for a single render cycle.
#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub snapshot: SensorSnapshot,
    pub health: HealthAssessment,
    pub ph: MetricAssessment,
    pub conductivity: MetricAssessment,
    pub water_temperature: MetricAssessment,
    pub uptime_secs: i64,
    pub data_points: u64,
}

fn build_generator(config: &SystemConfig, seed: Option<u64>) -> Result<ReadingGenerator> {
    let builder = GeneratorBuilder::new().with_config(*config);
    let builder = match seed {
        Some(seed) => builder.with_seed(seed),
        None => builder,
    };
    builder.build().context("Failed to build reading generator")
}

/// Takes one reading and scores it.
pub fn render_cycle(generator: &mut ReadingGenerator, scorer: &HealthScorer) -> DashboardReport {
    let snapshot = generator.produce_current_reading();
    let health = scorer.calculate_system_health(&snapshot);
    DashboardReport {
        ph: scorer.assess_ph(snapshot.ph),
        conductivity: scorer.assess_conductivity(snapshot.conductivity),
        water_temperature: scorer.assess_temperature(snapshot.water_temperature),
        uptime_secs: generator.uptime_at(snapshot.timestamp).num_seconds(),
        data_points: generator.sequence_step(),
        snapshot,
        health,
    }
}

/// One render cycle of the dashboard: current reading, metric cards, health
/// score and the six-hour charts.
pub fn run_dashboard(
    config: &SystemConfig,
    output_dir: &Path,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    println!("\n--- [Workflow] Rendering Dashboard ---");
    let mut generator = build_generator(config, seed)?;
    let scorer = HealthScorer::new(*config)?;

    let report = render_cycle(&mut generator, &scorer);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_dashboard(&report);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    let log_path = output_dir.join("history.csv");
    let history: Vec<SensorSnapshot> = generator
        .produce_history(
            Duration::hours(DASHBOARD_HISTORY_HOURS),
            DASHBOARD_HISTORY_POINTS,
        )
        .collect();
    let mut logger = TimeSeriesLogger::new(&log_path)?;
    logger.log_all(&history)?;

    plotting::generate_dashboard_plots(output_dir, &log_path, config)?;
    Ok(())
}

/// Periodically re-runs the render cycle, appending each snapshot to a log.
///
/// Runs `ticks` cycles, or until interrupted when `ticks` is `None`.
pub fn run_monitor(
    config: &SystemConfig,
    ticks: Option<u64>,
    interval: time::Duration,
    log_path: Option<&Path>,
    seed: Option<u64>,
) -> Result<()> {
    println!("\n--- [Workflow] Starting Monitor ---");
    let mut generator = build_generator(config, seed)?;
    let scorer = HealthScorer::new(*config)?;
    let mut logger = log_path.map(TimeSeriesLogger::new).transpose()?;

    let mut tick = 0u64;
    while ticks.map_or(true, |limit| tick < limit) {
        if tick > 0 {
            thread::sleep(interval);
        }
        let report = render_cycle(&mut generator, &scorer);
        print_monitor_line(&report);
        if let Some(logger) = logger.as_mut() {
            logger.log_snapshot(&report.snapshot)?;
        }

        tick += 1;
    }

    if let Some(logger) = &logger {
        tracing::info!(rows = logger.rows_written(), path = logger.path(), "monitor log closed");
    }
    println!("Monitor stopped after {} readings.", tick);
    Ok(())
}

/// Historical trend analysis for the selected window.
pub fn run_analytics(
    config: &SystemConfig,
    range: TimeRange,
    output_dir: &Path,
    seed: Option<u64>,
) -> Result<()> {
    println!("\n--- [Workflow] Historical Trend Analysis ---");
    let mut generator = build_generator(config, seed)?;

    let points = range.point_count();
    println!("{}: {} data points", range.label(), points);
    let history: Vec<SensorSnapshot> = generator
        .produce_history(Duration::hours(range.hours()), points)
        .collect();

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    let mut logger = TimeSeriesLogger::new(output_dir.join("analytics.csv"))?;
    logger.log_all(&history)?;

    print_statistical_summary(&history);
    let chart = plotting::plot_multi_metric(output_dir, &history)?;
    println!("\nMulti-metric chart saved to '{}'", chart);
    Ok(())
}

fn format_uptime(secs: i64) -> String {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

fn print_dashboard(report: &DashboardReport) {
    let s = &report.snapshot;
    println!("\n========================================");
    println!("OVERALL SYSTEM HEALTH: {:.1} ({})", report.health.score, report.health.status);
    println!("========================================");
    println!("Last Update:   {}", s.timestamp.format("%H:%M:%S"));
    println!("Ambient:       {:.1}°C / {:.1}%", s.air_temperature, s.humidity);
    println!("System Uptime: {}", format_uptime(report.uptime_secs));
    println!("Battery:       {:.2}V", s.battery_voltage);
    println!("Water Level:   {:.1} cm", s.water_level);
    println!("Data Points:   {}", report.data_points);

    println!("\nCritical Parameters:");
    let cards = [
        (Metric::Ph, &report.ph),
        (Metric::Conductivity, &report.conductivity),
        (Metric::WaterTemperature, &report.water_temperature),
    ];
    for (metric, assessment) in cards {
        println!(
            "  - {:<18} {:>6.prec$} {:<6} [{:<7}] {}",
            metric.label(),
            metric.value_of(s),
            metric.unit(),
            assessment.band,
            assessment.message,
            prec = metric.precision(),
        );
    }

    let b = &report.health.breakdown;
    println!(
        "\nSub-scores: pH {:.1} | EC {:.1} | Temperature {:.1} | Water {:.1}",
        b.ph, b.conductivity, b.temperature, b.water_level
    );
}

fn print_monitor_line(report: &DashboardReport) {
    let s = &report.snapshot;
    println!(
        "[{}] #{:<5} pH {:.2} ({}) | EC {:.2} ({}) | Water {:.1}°C ({}) | Level {:.1} cm | Health {:.1} {}",
        s.timestamp.format("%H:%M:%S"),
        s.sequence_step,
        s.ph,
        report.ph.band,
        s.conductivity,
        report.conductivity.band,
        s.water_temperature,
        report.water_temperature.band,
        s.water_level,
        report.health.score,
        report.health.status,
    );
}

fn print_statistical_summary(history: &[SensorSnapshot]) {
    println!("\nStatistical Summary:");
    println!(
        "  {:<20} {:>10} {:>10} {:>10} {:>10}",
        "Metric", "Mean", "Std Dev", "Min", "Range"
    );
    for metric in Metric::ALL {
        if let Some(summary) = summarize(history, metric) {
            println!(
                "  {:<20} {:>10.prec$} {:>10.3} {:>10.prec$} {:>10.prec$}",
                format!("{} ({})", metric.label(), metric.unit()),
                summary.mean,
                summary.std_dev,
                summary.min,
                summary.range(),
                prec = metric.precision(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_format() {
        assert_eq!(format_uptime(0), "0h 0m");
        assert_eq!(format_uptime(3 * 3600 + 25 * 60 + 59), "3h 25m");
    }

    #[test]
    fn render_cycle_advances_data_points() {
        let config = SystemConfig::default();
        let mut generator = build_generator(&config, Some(5)).unwrap();
        let scorer = HealthScorer::new(config).unwrap();

        let first = render_cycle(&mut generator, &scorer);
        let second = render_cycle(&mut generator, &scorer);
        assert_eq!(first.data_points, 1);
        assert_eq!(second.data_points, 2);
        assert_eq!(second.snapshot.sequence_step, 2);
        assert!(second.uptime_secs >= 0);
    }

    #[test]
    fn monitor_writes_one_row_per_tick() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("monitor.csv");
        run_monitor(
            &SystemConfig::default(),
            Some(3),
            time::Duration::from_millis(0),
            Some(log.as_path()),
            Some(1),
        )
        .unwrap();

        let rows = plotting::parse_log_file(&log).unwrap();
        let steps: Vec<u64> = rows.iter().map(|r| r.sequence_step).collect();
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[test]
    fn monitor_with_zero_ticks_takes_no_reading() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("idle.csv");
        run_monitor(
            &SystemConfig::default(),
            Some(0),
            time::Duration::from_millis(0),
            Some(log.as_path()),
            Some(1),
        )
        .unwrap();

        assert!(plotting::parse_log_file(&log).unwrap().is_empty());
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod plotting;
mod workflow;

/// Simulated hydroponic monitoring dashboard.
#[derive(Debug, Parser)]
#[command(name = "hydrovision", version, about)]
struct Cli {
    /// YAML configuration file with targets and ranges.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible sensor noise.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one dashboard cycle: metric cards, health score and charts.
    Dashboard {
        /// Directory for the history CSV and charts.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Refresh readings on a timer.
    Monitor {
        /// Number of readings to take; runs until interrupted if omitted.
        #[arg(short = 'n', long)]
        ticks: Option<u64>,

        #[arg(long, default_value_t = 3000)]
        interval_ms: u64,

        /// Append every reading to this CSV file.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Historical trend analysis with statistical summary.
    Analytics {
        #[arg(short, long, value_enum, default_value = "24h")]
        range: config::TimeRange,

        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn run_dir(kind: &str) -> PathBuf {
    PathBuf::from(format!(
        "./data/runs/{}_{}",
        kind,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    println!("--- HydroVision ---");

    let system = config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Dashboard { output_dir, json } => {
            let output_dir = output_dir.unwrap_or_else(|| run_dir("dashboard"));
            workflow::run_dashboard(&system, &output_dir, cli.seed, json)?;
            println!("\nDashboard rendered. Results are in '{}'", output_dir.display());
        }
        Command::Monitor {
            ticks,
            interval_ms,
            log,
        } => {
            workflow::run_monitor(
                &system,
                ticks,
                Duration::from_millis(interval_ms),
                log.as_deref(),
                cli.seed,
            )?;
        }
        Command::Analytics { range, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| run_dir("analytics"));
            workflow::run_analytics(&system, range, &output_dir, cli.seed)?;
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::ValueEnum;
use hydrovision_core::config::{load_system_config, validate};
use hydrovision_schemas::config::SystemConfig;
use std::path::Path;

/// Points per hour of simulated history in the analytics view.
pub const POINTS_PER_HOUR: usize = 12;
/// Upper bound on points in one analytics series.
pub const MAX_HISTORY_POINTS: usize = 288;

/// Loads the system configuration, falling back to the built-in defaults
/// when no file is given.
pub fn load(path: Option<&Path>) -> Result<SystemConfig> {
    match path {
        Some(path) => {
            println!("Loading configuration from '{}'...", path.display());
            load_system_config(path)
                .with_context(|| format!("Failed to load configuration from {:?}", path))
        }
        None => {
            let config = SystemConfig::default();
            validate(&config).context("Built-in configuration is invalid")?;
            Ok(config)
        }
    }
}

/// History windows offered by the analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeRange {
    #[value(name = "6h")]
    SixHours,
    #[value(name = "12h")]
    TwelveHours,
    #[value(name = "24h")]
    Day,
    #[value(name = "7d")]
    Week,
}

impl TimeRange {
    pub fn hours(self) -> i64 {
        match self {
            TimeRange::SixHours => 6,
            TimeRange::TwelveHours => 12,
            TimeRange::Day => 24,
            TimeRange::Week => 168,
        }
    }

    /// Twelve points per hour, capped so long windows stay readable.
    pub fn point_count(self) -> usize {
        (self.hours() as usize * POINTS_PER_HOUR).min(MAX_HISTORY_POINTS)
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::SixHours => "Last 6 Hours",
            TimeRange::TwelveHours => "Last 12 Hours",
            TimeRange::Day => "Last 24 Hours",
            TimeRange::Week => "Last 7 Days",
        }
    }
}

use serde::{Deserialize, Serialize};

/// A symmetric tolerance window around a target value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricTarget {
    pub target: f64,
    pub tolerance: f64,
}

impl MetricTarget {
    pub fn min(&self) -> f64 {
        self.target - self.tolerance
    }

    pub fn max(&self) -> f64 {
        self.target + self.tolerance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
}

impl TemperatureRange {
    /// Half the acceptable range, used as the scoring tolerance.
    pub fn half_range(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self {
            min: 18.0,
            max: 22.0,
            optimal: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelRange {
    pub min: f64,
    pub max: f64,
}

impl LevelRange {
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self { min: 5.0, max: 15.0 }
    }
}

/// Drift constants and physical floors of the reading generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationProfile {
    pub conductivity_floor: f64,
    pub battery_nominal: f64,
    pub battery_floor: f64,
    pub water_level_start: f64,
    pub air_temperature_base: f64,
    pub humidity_base: f64,
}

impl Default for SimulationProfile {
    fn default() -> Self {
        Self {
            conductivity_floor: 0.8,
            battery_nominal: 14.8,
            battery_floor: 11.0,
            water_level_start: 10.0,
            air_temperature_base: 25.0,
            humidity_base: 70.0,
        }
    }
}

/// Targets and ranges shared by the generator and the health scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub ph: MetricTarget,
    pub conductivity: MetricTarget,
    pub temperature: TemperatureRange,
    pub water_level: LevelRange,
    pub simulation: SimulationProfile,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ph: MetricTarget {
                target: 5.8,
                tolerance: 0.15,
            },
            conductivity: MetricTarget {
                target: 1.2,
                tolerance: 0.08,
            },
            temperature: TemperatureRange::default(),
            water_level: LevelRange::default(),
            simulation: SimulationProfile::default(),
        }
    }
}

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One synthetic reading of every tracked metric at a single point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub timestamp: DateTime<Local>,
    pub sequence_step: u64,
    pub ph: f64,
    /// mS/cm
    pub conductivity: f64,
    /// °C
    pub water_temperature: f64,
    /// °C
    pub air_temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// cm from the sensor.
    pub water_level: f64,
    /// Volts.
    pub battery_voltage: f64,
}

/// The metrics carried by a `SensorSnapshot`, used to select a column for
/// charts and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Ph,
    Conductivity,
    WaterTemperature,
    AirTemperature,
    Humidity,
    WaterLevel,
    BatteryVoltage,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Ph,
        Metric::Conductivity,
        Metric::WaterTemperature,
        Metric::AirTemperature,
        Metric::Humidity,
        Metric::WaterLevel,
        Metric::BatteryVoltage,
    ];

    pub fn value_of(self, snapshot: &SensorSnapshot) -> f64 {
        match self {
            Metric::Ph => snapshot.ph,
            Metric::Conductivity => snapshot.conductivity,
            Metric::WaterTemperature => snapshot.water_temperature,
            Metric::AirTemperature => snapshot.air_temperature,
            Metric::Humidity => snapshot.humidity,
            Metric::WaterLevel => snapshot.water_level,
            Metric::BatteryVoltage => snapshot.battery_voltage,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Ph => "pH Level",
            Metric::Conductivity => "EC Level",
            Metric::WaterTemperature => "Water Temperature",
            Metric::AirTemperature => "Air Temperature",
            Metric::Humidity => "Relative Humidity",
            Metric::WaterLevel => "Water Level",
            Metric::BatteryVoltage => "Battery Voltage",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Ph => "pH",
            Metric::Conductivity => "mS/cm",
            Metric::WaterTemperature | Metric::AirTemperature => "°C",
            Metric::Humidity => "%",
            Metric::WaterLevel => "cm",
            Metric::BatteryVoltage => "V",
        }
    }

    /// Number of decimals the metric is rounded to when generated.
    pub fn precision(self) -> usize {
        match self {
            Metric::Ph | Metric::Conductivity | Metric::BatteryVoltage => 2,
            Metric::WaterTemperature
            | Metric::AirTemperature
            | Metric::Humidity
            | Metric::WaterLevel => 1,
        }
    }

    /// Short identifier, also used for chart file names.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Ph => "ph",
            Metric::Conductivity => "conductivity",
            Metric::WaterTemperature => "water_temperature",
            Metric::AirTemperature => "air_temperature",
            Metric::Humidity => "humidity",
            Metric::WaterLevel => "water_level",
            Metric::BatteryVoltage => "battery_voltage",
        }
    }
}

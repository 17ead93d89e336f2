use crate::error::HydroError;
use hydrovision_schemas::{config::SystemConfig, file_formats::ConfigFile};
use std::{fs, path::Path};

/// Checks the invariants every component relies on.
///
/// # Errors
///
/// Returns `HydroError::Config` if a value is not finite, a tolerance is not
/// strictly positive, or a min/max range is inverted.
pub fn validate(config: &SystemConfig) -> Result<(), HydroError> {
    let sim = &config.simulation;
    let values = [
        ("ph target", config.ph.target),
        ("conductivity target", config.conductivity.target),
        ("temperature min", config.temperature.min),
        ("temperature max", config.temperature.max),
        ("temperature optimal", config.temperature.optimal),
        ("water level min", config.water_level.min),
        ("water level max", config.water_level.max),
        ("conductivity floor", sim.conductivity_floor),
        ("battery nominal", sim.battery_nominal),
        ("battery floor", sim.battery_floor),
        ("water level start", sim.water_level_start),
        ("air temperature base", sim.air_temperature_base),
        ("humidity base", sim.humidity_base),
    ];
    for (name, value) in values {
        check_finite(name, value)?;
    }

    check_tolerance("ph", config.ph.tolerance)?;
    check_tolerance("conductivity", config.conductivity.tolerance)?;

    let temp = &config.temperature;
    if temp.min > temp.max {
        return Err(HydroError::Config(format!(
            "temperature min ({}) must not exceed max ({})",
            temp.min, temp.max
        )));
    }
    // The temperature sub-score divides by half the range.
    check_tolerance("temperature range", temp.half_range())?;

    let level = &config.water_level;
    if level.min > level.max {
        return Err(HydroError::Config(format!(
            "water level min ({}) must not exceed max ({})",
            level.min, level.max
        )));
    }

    if !(temp.min..=temp.max).contains(&temp.optimal) {
        tracing::warn!(
            optimal = temp.optimal,
            min = temp.min,
            max = temp.max,
            "optimal temperature lies outside the acceptable range"
        );
    }

    Ok(())
}

fn check_finite(name: &str, value: f64) -> Result<(), HydroError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HydroError::Config(format!("{} must be finite, got {}", name, value)))
    }
}

fn check_tolerance(name: &str, tolerance: f64) -> Result<(), HydroError> {
    if tolerance.is_finite() && tolerance > 0.0 {
        Ok(())
    } else {
        Err(HydroError::Config(format!(
            "{} tolerance must be positive, got {}",
            name, tolerance
        )))
    }
}

/// Reads a YAML configuration file and validates it.
pub fn load_system_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig, HydroError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| HydroError::FileIO(shown.clone(), e))?;
    let file: ConfigFile =
        serde_yaml::from_str(&content).map_err(|e| HydroError::YamlParsing(shown.clone(), e))?;

    tracing::debug!(path = %shown, schema_version = %file.schema_version, "loaded system config");
    validate(&file.system)?;
    Ok(file.system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&SystemConfig::default()).is_ok());
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let mut config = SystemConfig::default();
        config.ph.tolerance = 0.0;
        assert!(matches!(validate(&config), Err(HydroError::Config(_))));

        let mut config = SystemConfig::default();
        config.conductivity.tolerance = -0.1;
        assert!(matches!(validate(&config), Err(HydroError::Config(_))));

        let mut config = SystemConfig::default();
        config.ph.tolerance = f64::NAN;
        assert!(matches!(validate(&config), Err(HydroError::Config(_))));
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut config = SystemConfig::default();
        config.ph.target = f64::NAN;
        assert!(matches!(validate(&config), Err(HydroError::Config(_))));

        let mut config = SystemConfig::default();
        config.temperature.optimal = f64::INFINITY;
        assert!(matches!(validate(&config), Err(HydroError::Config(_))));

        let mut config = SystemConfig::default();
        config.water_level.max = f64::INFINITY;
        assert!(matches!(validate(&config), Err(HydroError::Config(_))));

        let mut config = SystemConfig::default();
        config.simulation.battery_floor = f64::NEG_INFINITY;
        assert!(matches!(validate(&config), Err(HydroError::Config(_))));
    }

    #[test]
    fn rejects_inverted_ranges() {
        let mut config = SystemConfig::default();
        config.water_level.min = 16.0;
        assert!(matches!(validate(&config), Err(HydroError::Config(_))));

        let mut config = SystemConfig::default();
        config.temperature.min = 23.0;
        assert!(matches!(validate(&config), Err(HydroError::Config(_))));
    }

    #[test]
    fn rejects_empty_temperature_range() {
        let mut config = SystemConfig::default();
        config.temperature.min = 20.0;
        config.temperature.max = 20.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn loads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "schema_version: \"1.0\"\nsystem:\n  ph: {{ target: 6.0, tolerance: 0.1 }}\n  water_level: {{ min: 4.0, max: 12.0 }}"
        )
        .unwrap();

        let config = load_system_config(file.path()).unwrap();
        assert_eq!(config.ph.target, 6.0);
        assert_eq!(config.water_level.max, 12.0);
        assert_eq!(config.temperature, SystemConfig::default().temperature);
    }

    #[test]
    fn invalid_file_contents_are_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "schema_version: \"1.0\"\nsystem:\n  ph: {{ target: 6.0, tolerance: 0.0 }}").unwrap();
        assert!(matches!(load_system_config(file.path()), Err(HydroError::Config(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "schema_version: \"1.0\"\nsystem:\n  conductivity: {{ target: .nan, tolerance: 0.08 }}").unwrap();
        assert!(matches!(load_system_config(file.path()), Err(HydroError::Config(_))));

        let missing = load_system_config("/nonexistent/hydrovision.yaml");
        assert!(matches!(missing, Err(HydroError::FileIO(..))));
    }
}

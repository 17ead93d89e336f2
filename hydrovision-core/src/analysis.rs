use crate::{config, error::HydroError};
use hydrovision_schemas::{
    config::SystemConfig,
    health::{HealthAssessment, HealthBreakdown, HealthStatus, MetricAssessment, MetricSummary, StatusBand},
    snapshot::{Metric, SensorSnapshot},
};

/// Composite weights of the health score, in the order pH, conductivity,
/// temperature, water level. Must sum to 1.
pub const HEALTH_WEIGHTS: [f64; 4] = [0.30, 0.30, 0.25, 0.15];

const WATER_SCORE_LOW: f64 = 50.0;
const WATER_SCORE_HIGH: f64 = 70.0;
const WATER_SCORE_OK: f64 = 100.0;

/// The metrics that get a three-band assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessedMetric {
    Ph,
    Conductivity,
    Temperature,
}

impl AssessedMetric {
    /// Distance past the tolerance band before a reading is a danger.
    pub fn danger_margin(self) -> f64 {
        match self {
            AssessedMetric::Ph => 0.2,
            AssessedMetric::Conductivity => 0.1,
            AssessedMetric::Temperature => 2.0,
        }
    }

    fn optimal_message(self, target: f64, tolerance: f64) -> String {
        match self {
            AssessedMetric::Ph => format!("✓ Optimal range ({:.1} ± {:.2})", target, tolerance),
            AssessedMetric::Conductivity => {
                format!("✓ Optimal range ({:.1} ± {:.2} mS/cm)", target, tolerance)
            }
            AssessedMetric::Temperature => format!(
                "✓ Optimal range ({:.1}-{:.1}°C)",
                target - tolerance,
                target + tolerance
            ),
        }
    }

    fn danger_low_message(self) -> &'static str {
        match self {
            AssessedMetric::Ph => "⚠ Critically low! Add pH UP solution",
            AssessedMetric::Conductivity => "⚠ Critically low! Add nutrient solution",
            AssessedMetric::Temperature => "⚠ Too cold! Risk of slow growth",
        }
    }

    fn danger_high_message(self) -> &'static str {
        match self {
            AssessedMetric::Ph => "⚠ Critically high! Add pH DOWN solution",
            AssessedMetric::Conductivity => "⚠ Critically high! Dilute solution",
            AssessedMetric::Temperature => "⚠ Too hot! Risk of root damage",
        }
    }

    fn warning_low_message(self) -> &'static str {
        match self {
            AssessedMetric::Ph => "↓ Below target. Monitor closely",
            AssessedMetric::Conductivity => "↓ Below target. Consider adding nutrients",
            AssessedMetric::Temperature => "↓ Below optimal. Consider heating",
        }
    }

    fn warning_high_message(self) -> &'static str {
        match self {
            AssessedMetric::Ph => "↑ Above target. Monitor closely",
            AssessedMetric::Conductivity => "↑ Above target. Check concentration",
            AssessedMetric::Temperature => "↑ Above optimal. Improve cooling",
        }
    }
}

/// Classifies `value` against `target ± tolerance`.
///
/// Band edges are inclusive on the optimal side;
/// the danger margin comes from `metric`.
pub fn assess_metric(metric: AssessedMetric, value: f64, target: f64, tolerance: f64) -> MetricAssessment {
    let low = target - tolerance;
    let high = target + tolerance;
    let margin = metric.danger_margin();

    let (band, message) = if low <= value && value <= high {
        (StatusBand::Optimal, metric.optimal_message(target, tolerance))
    } else if value < low - margin {
        (StatusBand::Danger, metric.danger_low_message().to_string())
    } else if value > high + margin {
        (StatusBand::Danger, metric.danger_high_message().to_string())
    } else if value < low {
        (StatusBand::Warning, metric.warning_low_message().to_string())
    } else {
        (StatusBand::Warning, metric.warning_high_message().to_string())
    };

    MetricAssessment { band, message }
}

/// Sub-score for a deviation from target: 100 on target, 50 one tolerance
/// away, floored at 0 from two tolerances on.
pub fn deviation_score(value: f64, target: f64, tolerance: f64) -> f64 {
    let deviation = (value - target).abs() / tolerance;
    (100.0 - deviation * 50.0).max(0.0)
}

/// Scores snapshots against a validated `SystemConfig`.
#[derive(Debug, Clone)]
pub struct HealthScorer {
    config: SystemConfig,
}

impl HealthScorer {
    pub fn new(config: SystemConfig) -> Result<Self, HydroError> {
        config::validate(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn assess_ph(&self, value: f64) -> MetricAssessment {
        let ph = &self.config.ph;
        assess_metric(AssessedMetric::Ph, value, ph.target, ph.tolerance)
    }

    pub fn assess_conductivity(&self, value: f64) -> MetricAssessment {
        let ec = &self.config.conductivity;
        assess_metric(AssessedMetric::Conductivity, value, ec.target, ec.tolerance)
    }

    /// The optimal band is exactly the configured `[min, max]` range.
    pub fn assess_temperature(&self, value: f64) -> MetricAssessment {
        let temp = &self.config.temperature;
        assess_metric(
            AssessedMetric::Temperature,
            value,
            temp.midpoint(),
            temp.half_range(),
        )
    }

    fn water_level_score(&self, level: f64) -> f64 {
        let range = &self.config.water_level;
        if level < range.min {
            WATER_SCORE_LOW
        } else if level > range.max {
            WATER_SCORE_HIGH
        } else {
            WATER_SCORE_OK
        }
    }

    /// Weighted composite of the per-metric sub-scores.
    ///
    /// Each sub-score is floored at 0 before its weight is applied, so the
    /// result stays in `[0, 100]`. The score is rounded to one decimal.
    pub fn calculate_system_health(&self, snapshot: &SensorSnapshot) -> HealthAssessment {
        let c = &self.config;
        let breakdown = HealthBreakdown {
            ph: deviation_score(snapshot.ph, c.ph.target, c.ph.tolerance),
            conductivity: deviation_score(
                snapshot.conductivity,
                c.conductivity.target,
                c.conductivity.tolerance,
            ),
            temperature: deviation_score(
                snapshot.water_temperature,
                c.temperature.optimal,
                c.temperature.half_range(),
            ),
            water_level: self.water_level_score(snapshot.water_level),
        };

        let sub_scores = [
            breakdown.ph,
            breakdown.conductivity,
            breakdown.temperature,
            breakdown.water_level,
        ];
        let total: f64 = sub_scores
            .iter()
            .zip(HEALTH_WEIGHTS.iter())
            .map(|(score, weight)| score * weight)
            .sum();
        let score = ((total * 10.0).round() / 10.0).clamp(0.0, 100.0);

        HealthAssessment {
            score,
            status: HealthStatus::from_score(score),
            breakdown,
        }
    }
}

/// Mean, sample standard deviation and extremes of `metric` over `history`.
///
/// Returns `None` for an empty history.
pub fn summarize(history: &[SensorSnapshot], metric: Metric) -> Option<MetricSummary> {
    if history.is_empty() {
        return None;
    }
    let values: Vec<f64> = history.iter().map(|s| metric.value_of(s)).collect();
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std_dev = if count > 1 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(MetricSummary {
        count,
        mean,
        std_dev,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn snapshot_on_target() -> SensorSnapshot {
        SensorSnapshot {
            timestamp: Local::now(),
            sequence_step: 1,
            ph: 5.8,
            conductivity: 1.2,
            water_temperature: 20.0,
            air_temperature: 25.0,
            humidity: 70.0,
            water_level: 10.0,
            battery_voltage: 14.8,
        }
    }

    fn scorer() -> HealthScorer {
        HealthScorer::new(SystemConfig::default()).unwrap()
    }

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = HEALTH_WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ph_scenarios() {
        let scorer = scorer();
        assert_eq!(scorer.assess_ph(5.8).band, StatusBand::Optimal);
        assert_eq!(scorer.assess_ph(5.8).message, "✓ Optimal range (5.8 ± 0.15)");
        assert_eq!(scorer.assess_ph(6.2).band, StatusBand::Danger);
        assert_eq!(scorer.assess_ph(6.2).message, "⚠ Critically high! Add pH DOWN solution");
    }

    #[test]
    fn warning_messages_follow_direction() {
        let scorer = scorer();
        let low = scorer.assess_ph(5.55);
        assert_eq!(low.band, StatusBand::Warning);
        assert!(low.message.starts_with('↓'));

        let high = scorer.assess_conductivity(1.32);
        assert_eq!(high.band, StatusBand::Warning);
        assert_eq!(high.message, "↑ Above target. Check concentration");
    }

    #[test]
    fn boundaries_are_optimal() {
        assert_eq!(assess_metric(AssessedMetric::Ph, 1.5, 1.0, 0.5).band, StatusBand::Optimal);
        assert_eq!(assess_metric(AssessedMetric::Ph, 0.5, 1.0, 0.5).band, StatusBand::Optimal);
    }

    #[test]
    fn temperature_band_matches_range() {
        let scorer = scorer();
        assert_eq!(scorer.assess_temperature(18.0).band, StatusBand::Optimal);
        assert_eq!(scorer.assess_temperature(22.0).band, StatusBand::Optimal);
        assert_eq!(scorer.assess_temperature(17.0).band, StatusBand::Warning);
        assert_eq!(scorer.assess_temperature(15.9).band, StatusBand::Danger);
        assert_eq!(scorer.assess_temperature(24.5).message, "⚠ Too hot! Risk of root damage");
        assert_eq!(scorer.assess_temperature(20.0).message, "✓ Optimal range (18.0-22.0°C)");
    }

    #[test]
    fn perfect_snapshot_is_excellent() {
        let health = scorer().calculate_system_health(&snapshot_on_target());
        assert_eq!(health.score, 100.0);
        assert_eq!(health.status, HealthStatus::Excellent);
    }

    #[test]
    fn low_water_costs_seven_and_a_half_points() {
        let mut snapshot = snapshot_on_target();
        snapshot.water_level = 3.0;
        let health = scorer().calculate_system_health(&snapshot);
        assert_eq!(health.breakdown.water_level, 50.0);
        assert_eq!(health.score, 92.5);
    }

    #[test]
    fn high_water_scores_seventy() {
        let mut snapshot = snapshot_on_target();
        snapshot.water_level = 16.0;
        let health = scorer().calculate_system_health(&snapshot);
        assert_eq!(health.breakdown.water_level, 70.0);
        assert_eq!(health.score, 95.5);
    }

    #[test]
    fn sub_scores_floor_before_weighting() {
        let mut snapshot = snapshot_on_target();
        snapshot.ph = 14.0;
        let health = scorer().calculate_system_health(&snapshot);
        assert_eq!(health.breakdown.ph, 0.0);
        assert_eq!(health.score, 70.0);
        assert_eq!(health.status, HealthStatus::Fair);
    }

    #[test]
    fn everything_off_is_critical() {
        let snapshot = SensorSnapshot {
            ph: 3.0,
            conductivity: 3.0,
            water_temperature: 35.0,
            water_level: 1.0,
            ..snapshot_on_target()
        };
        let health = scorer().calculate_system_health(&snapshot);
        assert_eq!(health.score, 7.5);
        assert_eq!(health.status, HealthStatus::Critical);
    }

    #[test]
    fn one_tolerance_off_scores_fifty() {
        assert!((deviation_score(5.95, 5.8, 0.15) - 50.0).abs() < 1e-9);
        assert_eq!(deviation_score(6.2, 5.8, 0.15), 0.0);
    }

    #[test]
    fn scorer_refuses_non_finite_targets() {
        let mut config = SystemConfig::default();
        config.ph.target = f64::NAN;
        assert!(matches!(HealthScorer::new(config), Err(HydroError::Config(_))));
    }

    #[test]
    fn summary_statistics() {
        let history: Vec<SensorSnapshot> = [5.6, 5.8, 6.0]
            .iter()
            .map(|&ph| SensorSnapshot { ph, ..snapshot_on_target() })
            .collect();
        let summary = summarize(&history, Metric::Ph).unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.mean - 5.8).abs() < 1e-12);
        assert!((summary.std_dev - 0.2).abs() < 1e-12);
        assert!((summary.range() - 0.4).abs() < 1e-12);

        let single = summarize(&history[..1], Metric::Ph).unwrap();
        assert_eq!(single.std_dev, 0.0);
        assert!(summarize(&[], Metric::Humidity).is_none());
    }
}

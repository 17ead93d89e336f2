use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-band classification of a single metric against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBand {
    Optimal,
    Warning,
    Danger,
}

impl fmt::Display for StatusBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusBand::Optimal => "optimal",
            StatusBand::Warning => "warning",
            StatusBand::Danger => "danger",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAssessment {
    pub band: StatusBand,
    pub message: String,
}

/// Qualitative label of the composite score, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Critical,
}

impl HealthStatus {
    /// Maps a composite score to its band. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            HealthStatus::Excellent
        } else if score >= 75.0 {
            HealthStatus::Good
        } else if score >= 60.0 {
            HealthStatus::Fair
        } else {
            HealthStatus::Critical
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Good => "Good",
            HealthStatus::Fair => "Fair",
            HealthStatus::Critical => "Critical",
        };
        f.pad(s)
    }
}

/// Unweighted per-metric sub-scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthBreakdown {
    pub ph: f64,
    pub conductivity: f64,
    pub temperature: f64,
    pub water_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub score: f64,
    pub status: HealthStatus,
    pub breakdown: HealthBreakdown,
}

/// Descriptive statistics of one metric over a history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_thresholds_are_lower_bound_inclusive() {
        assert_eq!(HealthStatus::from_score(100.0), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_score(90.0), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_score(89.9), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(75.0), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(60.0), HealthStatus::Fair);
        assert_eq!(HealthStatus::from_score(59.9), HealthStatus::Critical);
        assert_eq!(HealthStatus::from_score(0.0), HealthStatus::Critical);
    }

    #[test]
    fn bands_serialize_in_snake_case() {
        let json = serde_json::to_string(&StatusBand::Optimal).unwrap();
        assert_eq!(json, "\"optimal\"");
    }
}

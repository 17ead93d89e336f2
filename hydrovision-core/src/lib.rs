//! Sensor reading simulation and health scoring for a hydroponic system.
//!
//! [`simulation::ReadingGenerator`] produces synthetic snapshots and
//! [`analysis::HealthScorer`] turns a snapshot into metric bands and a
//! composite health score.

pub mod analysis;
pub mod config;
pub mod error;
pub mod logger;
pub mod simulation;

pub use analysis::HealthScorer;
pub use error::HydroError;
pub use simulation::{NoiseSource, ReadingGenerator, SeededNoise};

use super::{
    generator::ReadingGenerator,
    noise::{NoiseSource, SeededNoise},
};
use crate::error::HydroError;
use hydrovision_schemas::config::{SimulationProfile, SystemConfig};

/// A fluent builder for constructing a `ReadingGenerator`.
///
/// Starts from the default system configuration and an entropy-seeded noise
/// source; each setter replaces one part.
pub struct GeneratorBuilder<N = SeededNoise> {
    config: SystemConfig,
    noise: N,
}

impl GeneratorBuilder<SeededNoise> {
    pub fn new() -> Self {
        Self {
            config: SystemConfig::default(),
            noise: SeededNoise::from_entropy(),
        }
    }

    /// Makes the noise sequence reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.noise = SeededNoise::from_seed(seed);
        self
    }
}

impl Default for GeneratorBuilder<SeededNoise> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NoiseSource> GeneratorBuilder<N> {
    /// Sets the targets and ranges the generator centres its readings on.
    pub fn with_config(mut self, config: SystemConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides only the drift constants and physical floors.
    pub fn with_profile(mut self, profile: SimulationProfile) -> Self {
        self.config.simulation = profile;
        self
    }

    /// Replaces the noise source, e.g. with a deterministic one in tests.
    pub fn with_noise<M: NoiseSource>(self, noise: M) -> GeneratorBuilder<M> {
        GeneratorBuilder {
            config: self.config,
            noise,
        }
    }

    /// Consumes the builder and returns a configured `ReadingGenerator`.
    ///
    /// # Errors
    ///
    /// Returns `HydroError::Config` if the configuration is invalid.
    pub fn build(self) -> Result<ReadingGenerator<N>, HydroError> {
        ReadingGenerator::with_noise(&self.config, self.noise)
    }
}

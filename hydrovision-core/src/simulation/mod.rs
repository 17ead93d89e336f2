pub mod builder;
pub mod generator;
pub mod noise;

pub use builder::GeneratorBuilder;
pub use generator::{History, ReadingGenerator};
pub use noise::{NoiseSource, SeededNoise};

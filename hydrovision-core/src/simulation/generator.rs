use super::noise::{NoiseSource, SeededNoise};
use crate::{config, error::HydroError};
use chrono::{DateTime, Duration, Local, Timelike};
use hydrovision_schemas::{
    config::{LevelRange, SimulationProfile, SystemConfig},
    snapshot::SensorSnapshot,
};
use std::f64::consts::PI;

// Dosing correction cycle, period ≈ 126 steps.
const PH_CYCLE_RATE: f64 = 0.05;
const PH_CYCLE_AMPLITUDE: f64 = 0.08;
const PH_NOISE_SD: f64 = 0.02;

const EC_DEPLETION_PER_STEP: f64 = 0.001 / 100.0;
const EC_CYCLE_RATE: f64 = 0.03;
const EC_CYCLE_AMPLITUDE: f64 = 0.03;
const EC_NOISE_SD: f64 = 0.01;

const WATER_TEMP_DIURNAL_SWING: f64 = 1.5;
const WATER_TEMP_NOISE_SD: f64 = 0.3;

const AIR_TEMP_DIURNAL_SWING: f64 = 4.0;
const AIR_TEMP_NOISE_SD: f64 = 0.5;

const HUMIDITY_DIURNAL_SWING: f64 = 15.0;
const HUMIDITY_NOISE_SD: f64 = 2.0;

const WATER_CONSUMPTION_PER_STEP: f64 = 0.01;
const WATER_LEVEL_NOISE_SD: f64 = 0.2;

const BATTERY_DISCHARGE_PER_STEP: f64 = 0.001 / 100.0;
const BATTERY_NOISE_SD: f64 = 0.05;

/// Produces synthetic sensor snapshots for one monitoring session.
///
/// Each reading combines slow sinusoids, a diurnal factor shared by the
/// temperature and humidity channels, linear drift and Gaussian noise drawn
/// from `N`.
#[derive(Debug)]
pub struct ReadingGenerator<N = SeededNoise> {
    pub(super) sequence_step: u64,
    pub(super) session_start: DateTime<Local>,
    pub(super) ph_base: f64,
    pub(super) ec_base: f64,
    pub(super) temp_base: f64,
    pub(super) water_level: LevelRange,
    pub(super) profile: SimulationProfile,
    pub(super) noise: N,
}

impl ReadingGenerator<SeededNoise> {
    /// Creates a generator seeded from OS entropy.
    pub fn new(config: &SystemConfig) -> Result<Self, HydroError> {
        Self::with_noise(config, SeededNoise::from_entropy())
    }
}

impl<N: NoiseSource> ReadingGenerator<N> {
    /// Creates a generator drawing noise from `noise`.
    ///
    /// # Errors
    ///
    /// Returns `HydroError::Config` if `config` fails validation.
    pub fn with_noise(config: &SystemConfig, noise: N) -> Result<Self, HydroError> {
        config::validate(config)?;
        let generator = Self {
            sequence_step: 0,
            session_start: Local::now(),
            ph_base: config.ph.target,
            ec_base: config.conductivity.target,
            temp_base: config.temperature.optimal,
            water_level: config.water_level,
            profile: config.simulation,
            noise,
        };
        tracing::debug!(
            ph_base = generator.ph_base,
            ec_base = generator.ec_base,
            temp_base = generator.temp_base,
            "reading generator created"
        );
        Ok(generator)
    }

    /// Advances the step counter and samples a snapshot at the current time.
    pub fn produce_current_reading(&mut self) -> SensorSnapshot {
        self.produce_reading_at(Local::now())
    }

    /// Advances the step counter and samples a snapshot at `timestamp`.
    pub fn produce_reading_at(&mut self, timestamp: DateTime<Local>) -> SensorSnapshot {
        self.sequence_step += 1;
        let snapshot = self.sample(self.sequence_step, timestamp);
        tracing::trace!(
            step = snapshot.sequence_step,
            ph = snapshot.ph,
            conductivity = snapshot.conductivity,
            "produced reading"
        );
        snapshot
    }

    /// Generates `point_count` snapshots spread evenly over the `duration`
    /// that ends now, oldest first.
    ///
    /// Points are sampled lazily and independently, using their index as the
    /// phase input. The live step counter is left untouched.
    pub fn produce_history(&mut self, duration: Duration, point_count: usize) -> History<'_, N> {
        self.produce_history_until(Local::now(), duration, point_count)
    }

    /// Like [`produce_history`](Self::produce_history) with an explicit end time.
    ///
    /// The span is widened to at least one microsecond per point so
    /// timestamps stay strictly increasing, and shortened when its earliest
    /// point would fall before the earliest representable date.
    pub fn produce_history_until(
        &mut self,
        end: DateTime<Local>,
        duration: Duration,
        point_count: usize,
    ) -> History<'_, N> {
        History {
            generator: self,
            end,
            span_micros: history_span_micros(end, duration, point_count),
            point_count,
            index: 0,
        }
    }

    pub fn sequence_step(&self) -> u64 {
        self.sequence_step
    }

    pub fn session_start(&self) -> DateTime<Local> {
        self.session_start
    }

    /// Time elapsed since the session started, never negative.
    pub fn uptime_at(&self, timestamp: DateTime<Local>) -> Duration {
        (timestamp - self.session_start).max(Duration::zero())
    }

    fn sample(&mut self, step: u64, timestamp: DateTime<Local>) -> SensorSnapshot {
        let step_f = step as f64;
        let diurnal = diurnal_factor(&timestamp);
        let profile = self.profile;

        let ph = self.ph_base
            + (step_f * PH_CYCLE_RATE).sin() * PH_CYCLE_AMPLITUDE
            + self.noise.gaussian(0.0, PH_NOISE_SD);

        let conductivity = self.ec_base - EC_DEPLETION_PER_STEP * step_f
            + (step_f * EC_CYCLE_RATE).sin() * EC_CYCLE_AMPLITUDE
            + self.noise.gaussian(0.0, EC_NOISE_SD);

        let water_temperature = self.temp_base
            + diurnal * WATER_TEMP_DIURNAL_SWING
            + self.noise.gaussian(0.0, WATER_TEMP_NOISE_SD);

        let air_temperature = profile.air_temperature_base
            + diurnal * AIR_TEMP_DIURNAL_SWING
            + self.noise.gaussian(0.0, AIR_TEMP_NOISE_SD);

        // Humidity falls as the day warms up.
        let humidity = profile.humidity_base - diurnal * HUMIDITY_DIURNAL_SWING
            + self.noise.gaussian(0.0, HUMIDITY_NOISE_SD);

        let water_level = profile.water_level_start - step_f * WATER_CONSUMPTION_PER_STEP
            + self.noise.gaussian(0.0, WATER_LEVEL_NOISE_SD);

        let battery_voltage = profile.battery_nominal - BATTERY_DISCHARGE_PER_STEP * step_f
            + self.noise.gaussian(0.0, BATTERY_NOISE_SD);

        // Bounds are applied after rounding so they hold at display precision.
        SensorSnapshot {
            timestamp,
            sequence_step: step,
            ph: round_to(ph, 2),
            conductivity: round_to(conductivity, 2).max(profile.conductivity_floor),
            water_temperature: round_to(water_temperature, 1),
            air_temperature: round_to(air_temperature, 1),
            humidity: round_to(humidity, 1),
            water_level: clamp_nan_low(
                round_to(water_level, 1),
                self.water_level.min,
                self.water_level.max,
            ),
            battery_voltage: round_to(battery_voltage, 2).max(profile.battery_floor),
        }
    }
}

/// Lazy, finite series of historical snapshots returned by
/// [`ReadingGenerator::produce_history`].
#[derive(Debug)]
pub struct History<'a, N> {
    generator: &'a mut ReadingGenerator<N>,
    end: DateTime<Local>,
    span_micros: i64,
    point_count: usize,
    index: usize,
}

impl<N: NoiseSource> Iterator for History<'_, N> {
    type Item = SensorSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.point_count {
            return None;
        }
        let i = self.index;
        self.index += 1;

        let remaining = (self.point_count - i) as i128;
        let offset = self.span_micros as i128 * remaining / self.point_count as i128;
        // Only falls back when not even one microsecond per point fits.
        let timestamp = self
            .end
            .checked_sub_signed(Duration::microseconds(offset as i64))
            .unwrap_or(self.end);

        Some(self.generator.sample(i as u64, timestamp))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.point_count - self.index;
        (remaining, Some(remaining))
    }
}

impl<N: NoiseSource> ExactSizeIterator for History<'_, N> {}

fn history_span_micros(end: DateTime<Local>, duration: Duration, point_count: usize) -> i64 {
    let min_span = i64::try_from(point_count).unwrap_or(i64::MAX);
    let mut span = duration
        .abs()
        .num_microseconds()
        .unwrap_or(i64::MAX)
        .max(min_span);
    while span > min_span && end.checked_sub_signed(Duration::microseconds(span)).is_none() {
        span = (span / 2).max(min_span);
    }
    span
}

/// `sin(2π · hour / 24)` for the hour of `timestamp`.
pub fn diurnal_factor(timestamp: &DateTime<Local>) -> f64 {
    (2.0 * PI * timestamp.hour() as f64 / 24.0).sin()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `f64::clamp` that maps NaN to the lower bound instead of propagating it.
fn clamp_nan_low(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

//! The configuration for the simulation, given from environment variables and lazy
//! initialized when needed.

use std::str::FromStr;
use std::env;

use once_cell::sync::OnceCell;

use thiserror::Error;


/// Errors of an invalid environment configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not valid unicode")]
    NotUnicode { name: &'static str },
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange { name: &'static str, value: i64, min: i64, max: i64 },
}


/// Maximum radius of generated plants, this also bounds the island size.
pub const MAX_RADIUS: i32 = 64;
/// Maximum number of plants on the island.
pub const MAX_PLANTS: u32 = 256;

/// The whole simulation configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Seed of the world, random if not set.
    pub seed: Option<i64>,
    /// Radius of eagerly generated plants.
    pub radius: i32,
    /// Number of plants to grow on the island.
    pub plants: u32,
    /// Number of ticks to run, zero to run until interrupted.
    pub ticks: u64,
    /// Number of random ticks per chunk and per tick.
    pub random_ticks: u32,
}

impl SimConfig {

    /// Read the whole configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            seed: seed()?,
            radius: radius()?,
            plants: plants()?,
            ticks: ticks()?,
            random_ticks: random_ticks()?,
        })
    }

    /// Check that the island described by this configuration can be built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("CHORUS_RADIUS", self.radius as i64, 1, MAX_RADIUS as i64)?;
        check_range("CHORUS_PLANTS", self.plants as i64, 0, MAX_PLANTS as i64)?;
        Ok(())
    }

}


/// Return the world seed, if any.
///
/// To set it, use `CHORUS_SEED=<i64>`.
pub fn seed() -> Result<Option<i64>, ConfigError> {
    static ENV: OnceCell<Option<i64>> = OnceCell::new();
    ENV.get_or_try_init(|| read_var("CHORUS_SEED")).copied()
}

/// Return the radius of eagerly generated plants, 8 by default.
///
/// To change it, use `CHORUS_RADIUS=<i32>`.
pub fn radius() -> Result<i32, ConfigError> {
    static ENV: OnceCell<i32> = OnceCell::new();
    ENV.get_or_try_init(|| {
        let radius = read_var("CHORUS_RADIUS")?.unwrap_or(8);
        check_range("CHORUS_RADIUS", radius as i64, 1, MAX_RADIUS as i64)?;
        Ok(radius)
    }).copied()
}

/// Return the number of plants, 4 by default.
///
/// To change it, use `CHORUS_PLANTS=<u32>`.
pub fn plants() -> Result<u32, ConfigError> {
    static ENV: OnceCell<u32> = OnceCell::new();
    ENV.get_or_try_init(|| {
        let plants = read_var("CHORUS_PLANTS")?.unwrap_or(4);
        check_range("CHORUS_PLANTS", plants as i64, 0, MAX_PLANTS as i64)?;
        Ok(plants)
    }).copied()
}

/// Return the number of ticks to run, 0 (until interrupted) by default.
///
/// To change it, use `CHORUS_TICKS=<u64>`.
pub fn ticks() -> Result<u64, ConfigError> {
    static ENV: OnceCell<u64> = OnceCell::new();
    ENV.get_or_try_init(|| Ok(read_var("CHORUS_TICKS")?.unwrap_or(0))).copied()
}

/// Return the number of random ticks per chunk and per tick, 80 by default.
///
/// To change it, use `CHORUS_RANDOM_TICKS=<u32>`.
pub fn random_ticks() -> Result<u32, ConfigError> {
    static ENV: OnceCell<u32> = OnceCell::new();
    ENV.get_or_try_init(|| Ok(read_var("CHORUS_RANDOM_TICKS")?.unwrap_or(chorus::world::DEFAULT_RANDOM_TICKS))).copied()
}


/// Read and parse an environment variable, none is returned if the variable is not set.
fn read_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_value(name, &value).map(Some),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
    }
}

fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if value < min || value > max {
        Err(ConfigError::OutOfRange { name, value, min, max })
    } else {
        Ok(())
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid { name, value: value.to_string() })
}

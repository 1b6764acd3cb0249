//! Session configuration.
//!
//! Defaults mirror the shipped game; every field can be overridden through
//! `DONGLE_*` environment variables.

use std::path::PathBuf;

use crate::error::{DongleError, Result};
use crate::types::{
    DEFAULT_MAX_LEVEL, DEFAULT_POOL_SIZE, DEFAULT_SFX_CHANNELS, LEVEL_CAP, MAX_POOL_SIZE,
    MAX_SFX_CHANNELS, MIN_POOL_SIZE,
};

pub const ENV_POOL_SIZE: &str = "DONGLE_POOL_SIZE";
pub const ENV_MAX_LEVEL: &str = "DONGLE_MAX_LEVEL";
pub const ENV_SFX_CHANNELS: &str = "DONGLE_SFX_CHANNELS";
pub const ENV_SEED: &str = "DONGLE_SEED";
pub const ENV_SAVE_PATH: &str = "DONGLE_SAVE_PATH";
pub const ENV_LOG_PATH: &str = "DONGLE_LOG_PATH";

pub const DEFAULT_SAVE_PATH: &str = "dongle_best_score.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pieces built up front; the pool still grows on demand.
    pub pool_size: usize,
    /// Spawned levels are drawn from `[0, max_level)`.
    pub max_level: u8,
    /// Size of the sfx channel ring.
    pub sfx_channels: usize,
    /// RNG seed; `None` lets the runner pick one.
    pub seed: Option<u32>,
    pub save_path: PathBuf,
    /// Log file for `env_logger`; logging stays off when unset.
    pub log_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            max_level: DEFAULT_MAX_LEVEL,
            sfx_channels: DEFAULT_SFX_CHANNELS,
            seed: None,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            log_path: None,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let mut config = Self::default();

        if let Some(v) = get(ENV_POOL_SIZE) {
            config.pool_size = parse(ENV_POOL_SIZE, v)?;
        }
        if let Some(v) = get(ENV_MAX_LEVEL) {
            config.max_level = parse(ENV_MAX_LEVEL, v)?;
        }
        if let Some(v) = get(ENV_SFX_CHANNELS) {
            config.sfx_channels = parse(ENV_SFX_CHANNELS, v)?;
        }
        if let Some(v) = get(ENV_SEED) {
            config.seed = Some(parse(ENV_SEED, v)?);
        }
        if let Some(v) = get(ENV_SAVE_PATH) {
            config.save_path = PathBuf::from(v);
        }
        config.log_path = get(ENV_LOG_PATH).map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_POOL_SIZE..=MAX_POOL_SIZE).contains(&self.pool_size) {
            return Err(invalid(ENV_POOL_SIZE, self.pool_size, "must be within 1..=30"));
        }
        if self.max_level == 0 || self.max_level > LEVEL_CAP {
            return Err(invalid(ENV_MAX_LEVEL, self.max_level, "must be within 1..=11"));
        }
        if self.sfx_channels == 0 || self.sfx_channels > MAX_SFX_CHANNELS {
            return Err(invalid(
                ENV_SFX_CHANNELS,
                self.sfx_channels,
                "must be within 1..=16",
            ));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T> {
    value.parse().map_err(|_| DongleError::InvalidConfig {
        key,
        value,
        reason: "not a number",
    })
}

fn invalid(key: &'static str, value: impl ToString, reason: &'static str) -> DongleError {
    DongleError::InvalidConfig {
        key,
        value: value.to_string(),
        reason,
    }
}

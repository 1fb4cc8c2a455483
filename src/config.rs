//! Configuration management and validation.
//!
//! Configuration is read once from a TOML file and is immutable afterwards.
//! Missing sections fall back to the plant defaults in [`crate::constants`].

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_MAX_RETRY_DELAY_MS,
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS,
};
use crate::elevation::ElevationBounds;
use crate::error::{HydroError, Result};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydroConfig {
    /// Bounds of the elevation lookup table
    pub elevation: ElevationBounds,

    /// Retry settings for network-facing callers
    pub retry: RetryConfig,
}

/// Retry settings shared by both retry policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Calls for the fixed policy, extra calls for the exponential one
    pub attempts: u32,

    /// Pause before the first retry in milliseconds
    pub delay_ms: u64,

    /// Delay multiplier for exponential backoff
    pub multiplier: f64,

    /// Longest single backoff pause in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            max_delay_ms: DEFAULT_MAX_RETRY_DELAY_MS,
        }
    }
}

impl RetryConfig {
    pub fn fixed_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.attempts, Duration::from_millis(self.delay_ms))
    }

    pub fn backoff_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.attempts,
            Duration::from_millis(self.delay_ms),
            self.multiplier,
        )
        .with_max_delay(Duration::from_millis(self.max_delay_ms))
    }

    pub fn validate(&self) -> Result<()> {
        if self.attempts == 0 {
            return Err(HydroError::configuration(
                "Retry attempts must be at least 1",
            ));
        }
        if !(self.multiplier.is_finite() && self.multiplier >= 1.0) {
            return Err(HydroError::configuration(format!(
                "Backoff multiplier must be at least 1, got {}",
                self.multiplier
            )));
        }
        if self.max_delay_ms < self.delay_ms {
            return Err(HydroError::configuration(format!(
                "Maximum retry delay {} ms is below the initial delay {} ms",
                self.max_delay_ms, self.delay_ms
            )));
        }
        Ok(())
    }
}

impl HydroConfig {
    /// Default config file location under the user config directory
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| HydroError::configuration("Could not determine user config directory"))
    }

    /// Load configuration from an explicit file, or from the default
    /// location when it exists, or fall back to defaults.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading config file {}", path.display());
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| HydroError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.elevation.validate()?;
        self.retry.validate()
    }

    /// Override the elevation bounds
    pub fn with_elevation_bounds(mut self, bounds: ElevationBounds) -> Self {
        self.elevation = bounds;
        self
    }
}

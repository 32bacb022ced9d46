//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! tide-config.toml file. It provides a centralized way to configure the
//! forecast grid, the reference data location and chart output.
//!
//! Every section and field is optional; missing values take their defaults.

use crate::forecast::DEFAULT_DAYLIGHT_DAYS;
use crate::reconstruct::{ForecastSettings, DEFAULT_CADENCE_MINUTES, DEFAULT_HORIZON_DAYS};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, resolved against the working directory
pub const DEFAULT_CONFIG_PATH: &str = "tide-config.toml";

/// Errors that can occur while writing a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config IO: {0}")]
    Io(#[from] io::Error),
}

/// Application configuration loaded from tide-config.toml
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Forecast grid configuration
    pub forecast: ForecastConfig,
    /// Reference data location
    pub data: DataConfig,
    /// Terminal chart configuration
    pub display: DisplayConfig,
}

/// Forecast grid configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Length of the depth grid in days
    pub horizon_days: i64,
    /// Minutes between grid points
    pub cadence_minutes: i64,
    /// Days of sunrise/sunset windows for combined forecasts
    pub daylight_days: u32,
}

/// Reference data configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON file with vessels, ports and tide samples
    pub reference_path: PathBuf,
}

/// Terminal chart configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Chart width in character columns
    pub width: usize,
    /// Chart height in rows
    pub rows: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            horizon_days: DEFAULT_HORIZON_DAYS,
            cadence_minutes: DEFAULT_CADENCE_MINUTES,
            daylight_days: DEFAULT_DAYLIGHT_DAYS,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            reference_path: PathBuf::from("reference-data.json"),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 112, // one column per three hours over 14 days
            rows: 20,
        }
    }
}

impl Config {
    /// Load configuration from tide-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), "invalid config file format: {e}");
                    warn!("using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save configuration as pretty-printed TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Grid settings for the forecaster.
    ///
    /// Values too large to represent as a duration fall back to their defaults.
    pub fn forecast_settings(&self) -> ForecastSettings {
        let defaults = ForecastSettings::default();
        let horizon = Duration::try_days(self.forecast.horizon_days).unwrap_or_else(|| {
            warn!(
                horizon_days = self.forecast.horizon_days,
                "horizon out of range, using default"
            );
            defaults.horizon
        });
        let cadence = Duration::try_minutes(self.forecast.cadence_minutes).unwrap_or_else(|| {
            warn!(
                cadence_minutes = self.forecast.cadence_minutes,
                "cadence out of range, using default"
            );
            defaults.cadence
        });
        ForecastSettings { horizon, cadence }
    }
}

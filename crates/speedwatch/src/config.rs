//! Configuration management for speedwatch.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveTime;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "speedwatch";

/// Kitchen-clock format used for the service hours (`12:00AM`, `11:00PM`).
pub const CLOCK_FORMAT: &str = "%I:%M%p";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SPEEDWATCH_`)
/// 2. TOML config file at `~/.config/speedwatch/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// HTTP server configuration.
    pub server: ServerConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the per-day record files.
    /// Defaults to `~/.local/share/speedwatch`.
    pub dir: Option<PathBuf>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub addr: String,
    /// Start of the service window for query endpoints.
    pub open: String,
    /// End of the service window for query endpoints.
    pub close: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8001".to_string(),
            open: "12:00AM".to_string(),
            close: "11:00PM".to_string(),
        }
    }
}

/// The daily window during which query endpoints are served.
///
/// A request is admitted from the opening time up to, but not including,
/// the closing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceHours {
    /// Opening time.
    pub open: NaiveTime,
    /// Closing time.
    pub close: NaiveTime,
}

impl ServiceHours {
    /// Check whether requests at `now` fall inside the service window.
    #[must_use]
    pub fn admits(&self, now: NaiveTime) -> bool {
        now >= self.open && now < self.close
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `SPEEDWATCH_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("SPEEDWATCH_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.addr.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("invalid bind address: {}", self.server.addr),
            });
        }

        let hours = self.service_hours()?;
        if hours.open >= hours.close {
            return Err(Error::ConfigValidation {
                message: format!(
                    "service window is empty: opens {} but closes {}",
                    self.server.open, self.server.close
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Parse the configured service window.
    ///
    /// # Errors
    ///
    /// Returns an error if either time is not in kitchen-clock format.
    pub fn service_hours(&self) -> Result<ServiceHours> {
        let parse = |value: &str| {
            NaiveTime::parse_from_str(value, CLOCK_FORMAT).map_err(|err| Error::ConfigValidation {
                message: format!("unparsable service time {value:?}: {err}"),
            })
        };

        Ok(ServiceHours {
            open: parse(&self.server.open)?,
            close: parse(&self.server.close)?,
        })
    }
}

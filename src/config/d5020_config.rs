//! Configuration types and loading using Figment
//!
//! # Example
//!
//! ```no_run
//! use meadowlark_d5020::config::D5020Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = D5020Config::load()?;
//!     println!("Connection: {}", config.connection.url);
//!     println!("Log level: {}", config.logging.level);
//!     Ok(())
//! }
//! ```

use crate::error::{D5020Error, D5020Result};
use crate::hardware::limits::{MAX_VOLTAGE_MV, MIN_VOLTAGE_MV};
use crate::hardware::DeviceVariant;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "config/d5020.toml";

/// Top-level driver configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct D5020Config {
    /// Link to the controller
    pub connection: ConnectionConfig,
    /// Device variant and construction defaults
    pub device: DeviceConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// `tcp://host:port`, `serial:///dev/ttyUSB0` or a bare device path
    pub url: String,
    /// Baud rate (serial only)
    pub baud_rate: u32,
    /// Read timeout in milliseconds, 0 = wait forever
    pub timeout_ms: u64,
}

/// Device construction settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Dual or single channel hardware
    pub variant: DeviceVariant,
    /// Initial v2 in millivolts; the variant's default when absent
    pub v2_default: Option<i64>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_baud_rate() -> u32 {
    115200
}

fn default_timeout_ms() -> u64 {
    1000
}

impl D5020Config {
    /// Load configuration from `config/d5020.toml` and environment variables
    ///
    /// A missing file is not an error; built-in defaults apply. The result is
    /// not validated, so callers can still fill in the URL (e.g. from the
    /// command line) before calling [`D5020Config::validate`].
    pub fn load() -> D5020Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    pub fn load_from<P: AsRef<Path>>(path: P) -> D5020Result<Self> {
        let config: Self = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("D5020_").split("__"))
            .extract()?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// Checks:
    /// - A connection URL is set
    /// - Baud rate is non-zero
    /// - Log level is valid (trace, debug, info, warn, error)
    /// - `v2_default`, when set, is within the voltage range
    pub fn validate(&self) -> D5020Result<()> {
        if self.connection.url.trim().is_empty() {
            return Err(D5020Error::Configuration(
                "connection.url cannot be empty".to_string(),
            ));
        }

        if self.connection.baud_rate == 0 {
            return Err(D5020Error::Configuration(
                "connection.baud_rate must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(D5020Error::Configuration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        if let Some(v2) = self.device.v2_default {
            if !(MIN_VOLTAGE_MV..=MAX_VOLTAGE_MV).contains(&v2) {
                return Err(D5020Error::Configuration(format!(
                    "device.v2_default {} out of range {}..={} mV",
                    v2, MIN_VOLTAGE_MV, MAX_VOLTAGE_MV
                )));
            }
        }

        Ok(())
    }
}

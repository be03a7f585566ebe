//! Driver Configuration System
//!
//! This module provides configuration management using Figment.
//!
//! # Configuration Sources
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Environment variables prefixed with `D5020_`
//! 2. TOML configuration file (default: `config/d5020.toml`)
//! 3. Built-in defaults
//!
//! # Environment Variables
//!
//! Nested keys are separated by a double underscore:
//!
//! ```text
//! D5020_CONNECTION__URL=tcp://moxa.lab:4001
//! D5020_CONNECTION__TIMEOUT_MS=2000
//! D5020_LOGGING__LEVEL=debug
//! ```

pub mod d5020_config;

pub use d5020_config::{ConnectionConfig, D5020Config, DeviceConfig, LoggingConfig};

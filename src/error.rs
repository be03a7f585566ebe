//! Custom error types for the driver.
//!
//! This module defines the primary error type, `D5020Error`, for the whole crate.
//! Using the `thiserror` crate, it gives a single place where every failure the
//! driver can surface is described, from transport I/O to reply decoding.
//!
//! ## Error Hierarchy
//!
//! - **`Io`**: Wraps `std::io::Error` raised by the serial or TCP stream.
//! - **`Transport`**: A failure detected by an adapter itself (closed stream,
//!   read timeout enforced by the transport).
//! - **`Decode`**: A reply line could not be parsed into the expected numeric
//!   format. The raw reply is carried for diagnostics.
//! - **`Config`** / **`Configuration`**: Figment load errors and semantic
//!   validation errors.
//! - **`UnknownAttribute`** / **`InvalidAttributeValue`**: Failures of the
//!   string-keyed attribute interface used by the CLI.
//!
//! Out-of-range parameter values are not errors: the channel model saturates
//! them. Nothing here is ever retried by the driver.

use thiserror::Error;

/// Convenience alias for results using the driver error type.
pub type D5020Result<T> = std::result::Result<T, D5020Error>;

#[derive(Error, Debug)]
pub enum D5020Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected EOF from transport")]
    UnexpectedEof,

    #[error("Failed to decode reply '{reply}': {reason}")]
    Decode { reply: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Configuration validation error: {0}")]
    Configuration(String),

    #[error("Unsupported connection URL: {0}")]
    InvalidUrl(String),

    #[error("Serial support not enabled. Rebuild with --features instrument_serial")]
    SerialFeatureDisabled,

    #[error("Channel {0} does not exist on this device")]
    NoSuchChannel(u8),

    #[error("Unknown channel attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid value '{value}' for attribute '{name}'")]
    InvalidAttributeValue { name: String, value: String },
}

impl D5020Error {
    pub(crate) fn decode(reply: &[u8], reason: impl Into<String>) -> Self {
        D5020Error::Decode {
            reply: String::from_utf8_lossy(reply).into_owned(),
            reason: reason.into(),
        }
    }
}

//! Serial Hardware Adapter for the D5020 RS-232/USB-serial port

use super::LineTransport;
use crate::error::{D5020Error, D5020Result};
use std::time::Duration;

#[cfg(feature = "instrument_serial")]
use super::StreamAdapter;
#[cfg(feature = "instrument_serial")]
use tokio_serial::{SerialPortBuilderExt, SerialStream};
#[cfg(feature = "instrument_serial")]
use tracing::debug;

/// Default read timeout for the serial line.
const DEFAULT_SERIAL_TIMEOUT_MS: u64 = 1000;

/// Serial adapter for RS-232 communication
///
/// Holds the port settings and opens a tokio-serial stream wrapped in a
/// line-framing [`StreamAdapter`]. The controller uses 8N1 with no flow
/// control.
#[derive(Debug, Clone)]
pub struct SerialAdapter {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    port_name: String,

    /// Baud rate (e.g., 9600, 115200)
    baud_rate: u32,

    /// Read timeout
    timeout: Duration,
}

impl SerialAdapter {
    /// Create a new serial adapter with default settings
    ///
    /// # Arguments
    /// * `port_name` - Serial port path (e.g., "/dev/ttyUSB0", "COM3")
    /// * `baud_rate` - Communication speed (e.g., 9600, 115200)
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            timeout: Duration::from_millis(DEFAULT_SERIAL_TIMEOUT_MS),
        }
    }

    /// Set read timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Open the serial port
    #[cfg(feature = "instrument_serial")]
    pub fn connect(&self) -> D5020Result<Box<dyn LineTransport>> {
        let port: SerialStream = tokio_serial::new(&self.port_name, self.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                D5020Error::Transport(format!(
                    "Failed to open serial port '{}' at {} baud: {}",
                    self.port_name, self.baud_rate, e
                ))
            })?;

        debug!(
            "Serial port '{}' opened at {} baud",
            self.port_name, self.baud_rate
        );

        Ok(Box::new(
            StreamAdapter::new(self.port_name.clone(), port).with_timeout(self.timeout),
        ))
    }

    #[cfg(not(feature = "instrument_serial"))]
    pub fn connect(&self) -> D5020Result<Box<dyn LineTransport>> {
        Err(D5020Error::SerialFeatureDisabled)
    }
}

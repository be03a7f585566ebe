//! Meadowlark D5020 liquid crystal controller
//!
//! Protocol overview:
//! - Format: `<verb>:<channel>,<args>` (ASCII, `\n` terminated)
//! - Channels: 1 and 2, addressed in every command
//! - Timing: half-duplex request-response, replies only to `?` queries
//!
//! # Example Usage
//!
//! ```no_run
//! use meadowlark_d5020::{config::D5020Config, hardware::D5020};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = D5020Config::load()?;
//!     let mut d5020 = D5020::connect(&config).await?;
//!
//!     println!("Firmware: {}", d5020.query_firmware_version().await?);
//!
//!     let channel = d5020.channel_mut(1)?;
//!     channel.set_v1(2500).await?;
//!     println!("LC temperature: {:.2} °C", channel.query_lc_temperature().await?);
//!
//!     Ok(())
//! }
//! ```

use super::channel::Channel;
use super::codec;
use super::state::{ChannelNumber, ChannelState};
use crate::adapters::{open_transport, SharedTransport};
use crate::config::{D5020Config, DeviceConfig};
use crate::error::{D5020Error, D5020Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Hardware variant, determines which channels exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceVariant {
    /// Two outputs, channels 1 and 2
    #[default]
    Dual,
    /// One output, channel 1
    Single,
}

impl DeviceVariant {
    pub fn channels(self) -> &'static [ChannelNumber] {
        match self {
            DeviceVariant::Dual => &[ChannelNumber::One, ChannelNumber::Two],
            DeviceVariant::Single => &[ChannelNumber::One],
        }
    }

    /// Construction default for v2 in millivolts.
    pub fn default_v2(self) -> i64 {
        match self {
            DeviceVariant::Dual => 0,
            DeviceVariant::Single => 1000,
        }
    }
}

/// A D5020 controller: its channels plus device-level queries, all over one
/// shared transport.
#[derive(Debug)]
pub struct D5020 {
    transport: SharedTransport,
    variant: DeviceVariant,
    channels: Vec<Channel>,
}

impl D5020 {
    /// Dual-channel device with default channel state.
    pub fn new(transport: SharedTransport) -> Self {
        Self::with_config(transport, &DeviceConfig::default())
    }

    pub fn with_config(transport: SharedTransport, config: &DeviceConfig) -> Self {
        let variant = config.variant;
        let v2 = config.v2_default.unwrap_or_else(|| variant.default_v2());
        let state = ChannelState::default().with_v2(v2);

        let channels = variant
            .channels()
            .iter()
            .map(|&number| Channel::with_state(number, transport.clone(), state))
            .collect();

        Self {
            transport,
            variant,
            channels,
        }
    }

    /// Open the configured transport and build the device on it.
    pub async fn connect(config: &D5020Config) -> D5020Result<Self> {
        let transport = open_transport(&config.connection).await?;
        info!(
            "Connected to D5020 ({:?}) at {}",
            config.device.variant, config.connection.url
        );
        Ok(Self::with_config(transport, &config.device))
    }

    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, number: u8) -> D5020Result<&Channel> {
        self.channels
            .iter()
            .find(|c| c.number().number() == number)
            .ok_or(D5020Error::NoSuchChannel(number))
    }

    pub fn channel_mut(&mut self, number: u8) -> D5020Result<&mut Channel> {
        self.channels
            .iter_mut()
            .find(|c| c.number().number() == number)
            .ok_or(D5020Error::NoSuchChannel(number))
    }

    /// Firmware version string, exactly as replied.
    pub async fn query_firmware_version(&self) -> D5020Result<String> {
        let reply = self.transport.query(codec::FIRMWARE_QUERY).await?;
        codec::decode_firmware(reply)
    }
}

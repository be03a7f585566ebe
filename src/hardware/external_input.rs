//! External input control of a channel
//!
//! The controller exposes a single `extin:<ch>` command with no reply, and
//! it is not known whether a second `extin` disables the input again or is
//! ignored. The channel therefore talks to the external input through
//! [`ExternalInputControl`], so that behaviour can be replaced once it is
//! confirmed on hardware (or mocked in tests) without touching the channel.

use super::codec;
use super::state::ChannelNumber;
use crate::adapters::SharedTransport;
use crate::error::D5020Result;
use async_trait::async_trait;

#[async_trait]
pub trait ExternalInputControl: Send + Sync {
    /// Whether the host believes the external input is enabled.
    fn enabled(&self) -> bool;

    async fn toggle(&mut self, channel: ChannelNumber, transport: &SharedTransport)
        -> D5020Result<()>;
}

/// Unconfirmed toggle: flips the local flag and sends one `extin` command.
#[derive(Debug, Clone, Default)]
pub struct ToggleExternalInput {
    enabled: bool,
}

#[async_trait]
impl ExternalInputControl for ToggleExternalInput {
    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn toggle(
        &mut self,
        channel: ChannelNumber,
        transport: &SharedTransport,
    ) -> D5020Result<()> {
        self.enabled = !self.enabled;
        transport.send(&codec::encode_external_input(channel)).await
    }
}

//! D5020 device model and protocol
//!
//! - [`waveform`], [`limits`], [`state`]: the typed parameter model
//! - [`codec`]: command encoding and reply decoding
//! - [`channel`], [`d5020`]: the model bound to a transport

pub mod channel;
pub mod codec;
pub mod d5020;
pub mod external_input;
pub mod limits;
pub mod state;
pub mod waveform;

pub use channel::{AttributeValue, Channel};
pub use d5020::{DeviceVariant, D5020};
pub use external_input::{ExternalInputControl, ToggleExternalInput};
pub use limits::{Field, FieldSpec, Normalize, CHANNEL_FIELDS};
pub use state::{ChannelNumber, ChannelState};
pub use waveform::Waveform;

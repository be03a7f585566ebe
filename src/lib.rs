//! Host-side driver for the Meadowlark D5020 liquid crystal controller.
//!
//! The D5020 drives two liquid crystal cells with configurable waveforms and
//! regulates their temperature. This library contains the typed channel
//! model, the ASCII command codec and the serial/TCP transports that carry
//! it. It is used by the `d5020` command line tool and by any control system
//! adapter that wants to expose the device remotely.

pub mod adapters;
pub mod config;
pub mod error;
pub mod hardware;
pub mod logging;

pub use error::{D5020Error, D5020Result};
pub use hardware::{Channel, ChannelNumber, ChannelState, Waveform, D5020};

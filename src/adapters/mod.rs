//! Line transport adapters
//!
//! This module contains implementations of the [`LineTransport`] trait,
//! providing line-oriented I/O to the controller over serial or
//! serial-over-TCP links. The driver only ever needs "write a line" and
//! "read a line"; framing, timeouts and the physical link live here.

pub mod mock_adapter;
pub mod serial_adapter;
pub mod shared;
pub mod stream_adapter;
pub mod tcp_adapter;

pub use mock_adapter::MockAdapter;
pub use serial_adapter::SerialAdapter;
pub use shared::SharedTransport;
pub use stream_adapter::StreamAdapter;
pub use tcp_adapter::TcpAdapter;

use crate::config::ConnectionConfig;
use crate::error::{D5020Error, D5020Result};
use async_trait::async_trait;
use std::time::Duration;

/// Byte-oriented line channel to the controller.
///
/// `write_line` receives the line without its terminator; `read_line`
/// returns one reply line with the terminator removed.
#[async_trait]
pub trait LineTransport: Send {
    async fn write_line(&mut self, line: &[u8]) -> D5020Result<()>;
    async fn read_line(&mut self) -> D5020Result<Vec<u8>>;
}

#[async_trait]
impl<T: LineTransport + ?Sized> LineTransport for Box<T> {
    async fn write_line(&mut self, line: &[u8]) -> D5020Result<()> {
        (**self).write_line(line).await
    }

    async fn read_line(&mut self) -> D5020Result<Vec<u8>> {
        (**self).read_line().await
    }
}

/// Physical endpoint named by a connection URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `tcp://host:port`
    Tcp(String),
    /// `serial:///dev/ttyUSB0` or a bare device path
    Serial(String),
}

impl Endpoint {
    /// Parse a connection URL.
    ///
    /// A string without a scheme is taken as a serial device path.
    pub fn parse(url: &str) -> D5020Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(D5020Error::InvalidUrl("empty URL".to_string()));
        }

        match url.split_once("://") {
            Some((scheme, rest)) if !rest.is_empty() => match scheme.to_ascii_lowercase().as_str() {
                "tcp" => Ok(Endpoint::Tcp(rest.to_string())),
                "serial" => Ok(Endpoint::Serial(rest.to_string())),
                _ => Err(D5020Error::InvalidUrl(url.to_string())),
            },
            Some(_) => Err(D5020Error::InvalidUrl(url.to_string())),
            None => Ok(Endpoint::Serial(url.to_string())),
        }
    }
}

/// Open the transport described by `config` and wrap it for sharing
/// between channels.
pub async fn open_transport(config: &ConnectionConfig) -> D5020Result<SharedTransport> {
    let timeout = Duration::from_millis(config.timeout_ms);

    let transport: Box<dyn LineTransport> = match Endpoint::parse(&config.url)? {
        Endpoint::Tcp(addr) => Box::new(TcpAdapter::connect(&addr, timeout).await?),
        Endpoint::Serial(path) => SerialAdapter::new(path, config.baud_rate)
            .with_timeout(timeout)
            .connect()?,
    };

    Ok(SharedTransport::from_boxed(transport))
}

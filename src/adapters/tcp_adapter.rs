//! Serial-over-TCP adapter
//!
//! Terminal servers (Moxa and similar) expose the controller's RS-232 port as
//! a raw TCP socket. The byte stream is the same as on the serial line, so
//! this is a [`StreamAdapter`] over a [`TcpStream`].

use super::StreamAdapter;
use crate::error::{D5020Error, D5020Result};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Line adapter over a TCP socket.
pub type TcpAdapter = StreamAdapter<TcpStream>;

impl TcpAdapter {
    /// Connect to `addr` (`host:port`).
    ///
    /// `timeout` bounds both the connection attempt and every subsequent
    /// `read_line`. A zero duration means no timeout.
    pub async fn connect(addr: &str, timeout: Duration) -> D5020Result<Self> {
        let stream = if timeout.is_zero() {
            TcpStream::connect(addr).await?
        } else {
            tokio::time::timeout(timeout, TcpStream::connect(addr))
                .await
                .map_err(|_| {
                    D5020Error::Transport(format!("connect to {} timed out after {:?}", addr, timeout))
                })??
        };
        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);
        Ok(StreamAdapter::new(addr, stream).with_timeout(timeout))
    }
}

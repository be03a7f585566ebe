//! Line framing over any async byte stream.
//!
//! Both the serial port and the TCP socket are plain byte streams; this
//! adapter turns them into a [`LineTransport`] by appending `\n` on write and
//! reading up to the next `\n` on read.

use super::LineTransport;
use crate::error::{D5020Error, D5020Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

/// Line terminator used on both directions of the link.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Line-oriented adapter over an async stream.
pub struct StreamAdapter<S> {
    /// Name used in log events (port path or socket address)
    name: String,

    /// Buffered stream; writes pass through the buffer untouched
    stream: BufReader<S>,

    /// Read timeout, `None` blocks until a line arrives
    timeout: Option<Duration>,

    /// Bytes of a line not yet terminated; survives a timed-out read
    partial: Vec<u8>,
}

impl<S> StreamAdapter<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap `stream` with no read timeout.
    pub fn new(name: impl Into<String>, stream: S) -> Self {
        Self {
            name: name.into(),
            stream: BufReader::new(stream),
            timeout: None,
            partial: Vec::new(),
        }
    }

    /// Set read timeout. A zero duration disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl<S> LineTransport for StreamAdapter<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn write_line(&mut self, line: &[u8]) -> D5020Result<()> {
        let mut frame = Vec::with_capacity(line.len() + 1);
        frame.extend_from_slice(line);
        frame.push(LINE_TERMINATOR);

        let stream = self.stream.get_mut();
        stream.write_all(&frame).await?;
        stream.flush().await?;

        debug!(transport = %self.name, line = %String::from_utf8_lossy(line), "sent line");
        Ok(())
    }

    async fn read_line(&mut self) -> D5020Result<Vec<u8>> {
        // A cancelled read_until leaves what it consumed in `partial`
        let read = match self.timeout {
            Some(timeout) => {
                tokio::time::timeout(
                    timeout,
                    self.stream.read_until(LINE_TERMINATOR, &mut self.partial),
                )
                .await
                .map_err(|_| {
                    D5020Error::Transport(format!(
                        "read timeout after {:?} on {}",
                        timeout, self.name
                    ))
                })??
            }
            None => {
                self.stream
                    .read_until(LINE_TERMINATOR, &mut self.partial)
                    .await?
            }
        };

        if read == 0 {
            self.partial.clear();
            return Err(D5020Error::UnexpectedEof);
        }

        let mut line = std::mem::take(&mut self.partial);

        if line.last() == Some(&LINE_TERMINATOR) {
            line.pop();
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        debug!(transport = %self.name, line = %String::from_utf8_lossy(&line), "received line");
        Ok(line)
    }
}

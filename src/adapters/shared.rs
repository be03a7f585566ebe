//! Shared transport for channels on one physical connection
//!
//! Both channels of a D5020 talk over the same serial line. Replies carry no
//! request tag, so a query's write and its reply read must happen under one
//! lock; otherwise a second channel could slip a command in between and
//! consume the first channel's reply.

use super::LineTransport;
use crate::error::D5020Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;

/// Cloneable handle to a line transport with exclusive access per exchange.
#[derive(Clone)]
pub struct SharedTransport {
    inner: Arc<Mutex<Box<dyn LineTransport>>>,
}

impl SharedTransport {
    pub fn new<T: LineTransport + 'static>(transport: T) -> Self {
        Self::from_boxed(Box::new(transport))
    }

    pub fn from_boxed(transport: Box<dyn LineTransport>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(transport)),
        }
    }

    /// Write one command line; no reply is read.
    pub async fn send(&self, command: &str) -> D5020Result<()> {
        let mut transport = self.inner.lock().await;
        trace!(command, "send");
        transport.write_line(command.as_bytes()).await
    }

    /// Write one command line and read exactly one reply line.
    pub async fn query(&self, command: &str) -> D5020Result<Vec<u8>> {
        let mut transport = self.inner.lock().await;
        trace!(command, "query");
        transport.write_line(command.as_bytes()).await?;
        transport.read_line().await
    }
}

impl std::fmt::Debug for SharedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTransport").finish_non_exhaustive()
    }
}

//! Mock line transport for testing
//!
//! This adapter provides a simulated controller link for testing the driver
//! without physical hardware. It provides:
//! - Scripted reply lines, consumed in order
//! - Controllable failure injection
//! - Call logging for test verification

use super::LineTransport;
use crate::error::{D5020Error, D5020Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock line transport for testing
///
/// Clones share state, so a test keeps one clone for assertions and hands the
/// other to the driver.
///
/// # Example
///
/// ```
/// use meadowlark_d5020::adapters::{MockAdapter, SharedTransport};
///
/// let mock = MockAdapter::new();
/// mock.push_reply("32768");
/// let transport = SharedTransport::new(mock.clone());
/// assert!(mock.written().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct MockAdapter {
    replies: Arc<Mutex<VecDeque<Vec<u8>>>>,
    written: Arc<Mutex<Vec<Vec<u8>>>>,
    should_fail_next: Arc<AtomicBool>,
    call_log: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAdapter {
    /// Create a new mock adapter with no scripted replies
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply line, returned by the next unanswered `read_line`
    pub fn push_reply(&self, reply: impl AsRef<[u8]>) {
        lock(&self.replies).push_back(reply.as_ref().to_vec());
    }

    /// Inject a failure for the next operation
    pub fn inject_next_failure(&self) {
        self.should_fail_next.store(true, Ordering::SeqCst);
    }

    /// Check if a failure was injected
    fn check_failure(&self) -> bool {
        self.should_fail_next.swap(false, Ordering::SeqCst)
    }

    /// Lines written so far, lossily decoded
    pub fn written(&self) -> Vec<String> {
        lock(&self.written)
            .iter()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Most recent line written, if any
    pub fn last_written(&self) -> Option<String> {
        self.written().pop()
    }

    /// Number of replies still queued
    pub fn pending_replies(&self) -> usize {
        lock(&self.replies).len()
    }

    /// Get the call log
    pub fn call_log(&self) -> Vec<String> {
        lock(&self.call_log).clone()
    }

    /// Clear the written lines and the call log
    pub fn clear_log(&self) {
        lock(&self.written).clear();
        lock(&self.call_log).clear();
    }

    fn log_call(&self, call: String) {
        lock(&self.call_log).push(call);
    }
}

#[async_trait]
impl LineTransport for MockAdapter {
    async fn write_line(&mut self, line: &[u8]) -> D5020Result<()> {
        self.log_call(format!("write: {}", String::from_utf8_lossy(line)));

        if self.check_failure() {
            return Err(D5020Error::Transport("Injected failure".to_string()));
        }

        lock(&self.written).push(line.to_vec());
        Ok(())
    }

    async fn read_line(&mut self) -> D5020Result<Vec<u8>> {
        self.log_call("read".to_string());

        if self.check_failure() {
            return Err(D5020Error::Transport("Injected failure".to_string()));
        }

        lock(&self.replies)
            .pop_front()
            .ok_or(D5020Error::UnexpectedEof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_adapter_records_writes() {
        let mut adapter = MockAdapter::new();
        adapter.write_line(b"inv:1").await.unwrap();
        adapter.write_line(b"inv:2").await.unwrap();
        assert_eq!(adapter.written(), vec!["inv:1", "inv:2"]);
        assert_eq!(adapter.last_written().as_deref(), Some("inv:2"));
    }

    #[tokio::test]
    async fn test_mock_adapter_replies_in_order() {
        let mut adapter = MockAdapter::new();
        adapter.push_reply("1");
        adapter.push_reply("2");
        assert_eq!(adapter.read_line().await.unwrap(), b"1".to_vec());
        assert_eq!(adapter.read_line().await.unwrap(), b"2".to_vec());
        assert!(matches!(
            adapter.read_line().await,
            Err(D5020Error::UnexpectedEof)
        ));
    }

    #[tokio::test]
    async fn test_mock_adapter_failure_injection() {
        let mut adapter = MockAdapter::new();
        adapter.inject_next_failure();
        assert!(adapter.write_line(b"inv:1").await.is_err());
        // Failure should be consumed
        assert!(adapter.write_line(b"inv:1").await.is_ok());
        assert_eq!(adapter.written().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_adapter_clear_log() {
        let mut adapter = MockAdapter::new();
        adapter.write_line(b"ver:?").await.unwrap();
        assert_eq!(adapter.call_log().len(), 1);
        adapter.clear_log();
        assert!(adapter.call_log().is_empty());
        assert!(adapter.written().is_empty());
    }
}

//! In-memory `Client`/`IsotovideoClient` for driving the job lifecycle in
//! tests without a real socket or subprocess.

use crate::client::{Client, HttpMethod};
use crate::error::TransportError;
use crate::isotovideo::{IsotovideoClient, IsotovideoSnapshot};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Rest { method: HttpMethod, path: String, json: Option<Value> },
    Status(Value),
    Register,
}

/// Records every call in submission order under a `parking_lot::Mutex`,
/// which is what the S4–S6 scenario tests assert against.
#[derive(Clone, Default)]
pub struct MockClient {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    finished: Arc<Notify>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Simulates the control websocket closing.
    pub fn close(&self) {
        self.finished.notify_waiters();
    }
}

#[async_trait]
impl Client for MockClient {
    async fn send(&self, method: HttpMethod, path: &str, json: Option<Value>) -> Result<(), TransportError> {
        self.calls.lock().push(RecordedCall::Rest { method, path: path.to_string(), json });
        Ok(())
    }

    async fn send_status(&self, payload: Value) -> Result<(), TransportError> {
        self.calls.lock().push(RecordedCall::Status(payload));
        Ok(())
    }

    async fn register(&self) -> Result<(), TransportError> {
        self.calls.lock().push(RecordedCall::Register);
        Ok(())
    }

    async fn finished(&self) {
        self.finished.notified().await;
    }
}

/// Returns a fixed, settable snapshot instead of polling a real subprocess.
#[derive(Clone, Default)]
pub struct MockIsotovideoClient {
    snapshot: Arc<Mutex<IsotovideoSnapshot>>,
}

impl MockIsotovideoClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_snapshot(&self, snapshot: IsotovideoSnapshot) {
        *self.snapshot.lock() = snapshot;
    }
}

#[async_trait]
impl IsotovideoClient for MockIsotovideoClient {
    async fn status(&self) -> IsotovideoSnapshot {
        self.snapshot.lock().clone()
    }

    async fn stop(&self) {}
}

#[cfg(test)]
#[path = "mock_tests.rs"]
mod tests;

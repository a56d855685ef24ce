//! Outbound channel to the web UI: REST status/upload calls and the status
//! websocket, behind one [`Client`] trait so `wj-worker`'s runtime and its
//! tests can swap in [`crate::mock::MockClient`].

use crate::error::TransportError;
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, Notify};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Outbound channel to the web UI. `send` is fire-and-forget from the
/// Job's perspective: ordering between two `send` calls is preserved
/// (FIFO), but retries on failure are the `Client`'s business, not the
/// Job's.
#[async_trait]
pub trait Client: Send + Sync {
    async fn send(&self, method: HttpMethod, path: &str, json: Option<Value>) -> Result<(), TransportError>;
    async fn send_status(&self, payload: Value) -> Result<(), TransportError>;
    async fn register(&self) -> Result<(), TransportError>;
    /// Resolves once the control websocket has closed.
    async fn finished(&self);
}

/// Drives the status websocket's read half in the background and notifies
/// [`StatusWebSocket::finished`] callers once the stream closes.
pub struct StatusWebSocket {
    finished: Arc<Notify>,
    closed: Arc<AtomicBool>,
}

impl StatusWebSocket {
    pub fn spawn(mut read: SplitStream<WsStream>) -> Self {
        let finished = Arc::new(Notify::new());
        let closed = Arc::new(AtomicBool::new(false));
        let finished_task = finished.clone();
        let closed_task = closed.clone();
        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                if matches!(msg, Ok(Message::Close(_)) | Err(_)) {
                    break;
                }
            }
            closed_task.store(true, Ordering::SeqCst);
            finished_task.notify_waiters();
        });
        Self { finished, closed }
    }

    pub async fn finished(&self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        self.finished.notified().await;
    }
}

/// `Client` backed by a real `reqwest` connection for REST and a
/// `tokio-tungstenite` connection for the status websocket.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    // A single-held mutex around the whole send, rather than per-task
    // spawning, is what keeps `send` FIFO for concurrent callers.
    fifo: Mutex<()>,
    ws_write: Mutex<SplitSink<WsStream, Message>>,
    status_ws: StatusWebSocket,
}

impl RestClient {
    pub async fn connect(base_url: impl Into<String>, ws_url: &str) -> Result<Self, TransportError> {
        let (stream, _) = connect_async(ws_url).await?;
        let (write, read) = stream.split();
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            fifo: Mutex::new(()),
            ws_write: Mutex::new(write),
            status_ws: StatusWebSocket::spawn(read),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Client for RestClient {
    async fn send(&self, method: HttpMethod, path: &str, json: Option<Value>) -> Result<(), TransportError> {
        let _ordering = self.fifo.lock().await;
        let request = match method {
            HttpMethod::Get => self.http.get(self.url(path)),
            HttpMethod::Post => self.http.post(self.url(path)),
        };
        let request = match json {
            Some(body) => request.json(&body),
            None => request,
        };
        request.send().await?.error_for_status()?;
        Ok(())
    }

    async fn send_status(&self, payload: Value) -> Result<(), TransportError> {
        let mut write = self.ws_write.lock().await;
        write.send(Message::Text(payload.to_string())).await?;
        Ok(())
    }

    async fn register(&self) -> Result<(), TransportError> {
        self.send(HttpMethod::Post, "register", None).await
    }

    async fn finished(&self) {
        self.status_ws.finished().await
    }
}

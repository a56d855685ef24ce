//! Transport- and engine-level error types. Job-state misuse lives in
//! `wj_core::error` instead, since that crate has no I/O dependencies.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn isotovideo: {0}")]
    Spawn(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

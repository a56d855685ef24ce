//! Async I/O adapters for the worker job lifecycle: the REST/WebSocket
//! `Client`, the `isotovideo` REST client, the subprocess adapter, and the
//! pool directory. `wj-core` stays pure and synchronous; this is where the
//! state machine's effects actually touch the network, the filesystem, and
//! a subprocess.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod engine;
pub mod error;
pub mod isotovideo;
pub mod pool;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use client::{Client, HttpMethod, RestClient, StatusWebSocket};
pub use engine::{engine_workit, EngineHandle};
pub use error::{EngineError, TransportError};
pub use isotovideo::{HttpIsotovideoClient, IsotovideoClient, IsotovideoSnapshot};
pub use pool::PoolDirectory;

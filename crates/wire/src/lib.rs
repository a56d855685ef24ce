//! Wire DTOs for the REST status/upload channel and the control WebSocket.
//!
//! These mirror the exact JSON shapes the web UI expects; they carry no
//! behavior of their own; [`wj_core::job::Job`] decides when to produce
//! them and `wj-adapters` decides how to send them.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod status;

pub use status::{
    AcceptedMessage, RunningStatusFrame, TerminalStatusFrame, UploadMarkerFrame, UploadProgressBody,
};

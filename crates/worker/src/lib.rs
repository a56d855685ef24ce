//! `wj-worker`: the binary (`wjd`) that funnels external events into a
//! [`wj_core::Job`] and executes the effects it returns — settings
//! loading, tracing setup, `WorkerContext`, and the `JobRuntime` reactor.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod context;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod settings;

pub use context::WorkerContext;
pub use error::RuntimeError;
pub use runtime::{spawn_job_runtime, JobRuntime, RuntimeEvent};
pub use settings::{Settings, SettingsError};

//! Errors surfaced by the `JobRuntime`: a thin union over the `Job`'s own
//! programmer-error type and the transport/engine failures its effects can
//! hit, mirroring the teacher's `ExecuteError` split in `engine::executor`.

use thiserror::Error;
use wj_adapters::TransportError;
use wj_core::JobError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("job state machine rejected the call: {0}")]
    Job(#[from] JobError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("pool directory I/O error: {0}")]
    Pool(#[from] std::io::Error),
}

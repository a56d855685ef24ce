//! Programmer-error category for state-machine misuse.
//!
//! Transport-level failures (`TransportError`) live in `wj-adapters`, next
//! to the `reqwest`/`tokio-tungstenite` types they wrap — this crate has
//! no I/O dependencies and only needs to describe misuse of [`crate::job::Job`].

use thiserror::Error;

/// Returned by [`crate::job::Job`] methods when the caller violates a
/// state-machine precondition. Job state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("attempt to start job which is not accepted")]
    InvalidState,
    #[error("attempt to start job without ID and job info")]
    MissingId,
    #[error("livelog viewer count would go negative")]
    InvalidLivelogState,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

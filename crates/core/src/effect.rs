//! Effects represent side effects the [`crate::job::Job`] state machine
//! needs the runtime to perform. `Job` methods are synchronous and never do
//! I/O themselves; they return `Vec<Effect>` describing what must happen,
//! and the caller (the `JobRuntime` in `wj-worker`) executes them against
//! the real `Client`/engine adapters.

use crate::timer::TimerId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// `POST jobs/<id>/status` with the given status body.
    PostStatus { id: u64, status: serde_json::Value },

    /// `POST jobs/<id>/set_done`. Body is always `null`.
    PostSetDone { id: u64 },

    /// `POST /liveviewhandler/api/v1/jobs/<id>/upload_progress`. Only
    /// produced while livelog is active.
    PostUploadProgress { id: u64, progress: serde_json::Value },

    /// Push `{jobid, type:"accepted"}` over the status websocket.
    SendAccepted { id: u64 },

    /// Start the `isotovideo` subprocess for the current job.
    SpawnEngine,

    /// Stop the running `isotovideo` subprocess, if any.
    StopEngine,

    /// Arm a timer.
    SetTimer {
        id: TimerId,
        #[serde(with = "duration_serde")]
        duration: Duration,
    },

    /// Disarm a previously armed timer.
    CancelTimer { id: TimerId },
}

impl Effect {
    /// Effect name for log spans (e.g. "post_status", "spawn_engine").
    pub fn name(&self) -> &'static str {
        match self {
            Effect::PostStatus { .. } => "post_status",
            Effect::PostSetDone { .. } => "post_set_done",
            Effect::PostUploadProgress { .. } => "post_upload_progress",
            Effect::SendAccepted { .. } => "send_accepted",
            Effect::SpawnEngine => "spawn_engine",
            Effect::StopEngine => "stop_engine",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
        }
    }

    /// Key-value pairs for structured logging.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::PostStatus { id, .. } => vec![("job_id", id.to_string())],
            Effect::PostSetDone { id } => vec![("job_id", id.to_string())],
            Effect::PostUploadProgress { id, .. } => vec![("job_id", id.to_string())],
            Effect::SendAccepted { id } => vec![("job_id", id.to_string())],
            Effect::SpawnEngine => vec![],
            Effect::StopEngine => vec![],
            Effect::SetTimer { id, duration } => {
                vec![("timer_id", id.to_string()), ("duration_ms", duration.as_millis().to_string())]
            }
            Effect::CancelTimer { id } => vec![("timer_id", id.to_string())],
        }
    }

    /// Whether to log both "started" and "completed" or just "executed", to
    /// control verbosity for frequent effects.
    pub fn verbose(&self) -> bool {
        match self {
            Effect::SetTimer { .. } | Effect::CancelTimer { .. } => false,
            _ => true,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        duration.as_millis().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;

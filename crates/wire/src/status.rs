//! `jobs/<id>/status` body shapes and the `accepted` WebSocket message.
//!
//! A Job's status map takes on three distinct shapes over its life (see
//! `wj_core::job::Job::stop`/`on_engine_started`): a running frame, an
//! upload-marker frame on entering `stopping`, and a terminal frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Emitted once `setup` completes, i.e. on entering `running`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningStatusFrame {
    pub cmd_srv_url: Value,
    pub test_execution_paused: u8,
    pub worker_hostname: String,
    pub worker_id: String,
    /// Present only while livelog is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_log: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_terminal: Option<Value>,
}

/// Emitted on entering `stopping`, before the terminal frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UploadMarkerFrame<'a> {
    pub uploading: u8,
    pub worker_id: &'a str,
}

/// The final status frame for a Job, POSTed just before `set_done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalStatusFrame {
    pub backend: Value,
    pub cmd_srv_url: Value,
    pub result: Value,
    pub test_execution_paused: u8,
    pub test_order: Vec<Value>,
    pub worker_hostname: String,
    pub worker_id: String,
}

/// Body for `/liveviewhandler/api/v1/jobs/<id>/upload_progress`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadProgressBody {
    pub outstanding_files: u64,
    pub outstanding_images: u64,
    pub upload_up_to: Option<String>,
    pub upload_up_to_current_module: Option<String>,
}

/// The WebSocket message sent exactly once per accepted Job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptedMessage {
    pub jobid: u64,
    #[serde(rename = "type")]
    pub kind: AcceptedKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AcceptedKind {
    #[serde(rename = "accepted")]
    Accepted,
}

impl AcceptedMessage {
    pub fn new(jobid: u64) -> Self {
        Self { jobid, kind: AcceptedKind::Accepted }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;

//! The per-job state machine.
//!
//! `Job` is synchronous and side-effect free: every method that can trigger
//! outbound I/O returns the [`Effect`]s describing it instead of performing
//! it, so the whole lifecycle is unit-testable without a reactor, a socket,
//! or a subprocess. The caller — the `JobRuntime` in `wj-worker` — executes
//! the effects and feeds the results back in through the `on_*` methods.

use crate::effect::Effect;
use crate::error::JobError;
use crate::event::{EventBus, JobEvent};
use crate::timer::TimerId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

crate::define_id! {
    /// Local correlation id for a job instance — used for timer/log
    /// correlation only. Distinct from [`Job::id`], the web UI's own job id.
    pub struct JobId("job-");
}

/// How often enriched status frames go out while livelog is active.
pub const LIVELOG_FRAME_INTERVAL: Duration = Duration::from_secs(10);

/// Status of a [`Job`]. Initial `New`, terminal `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    New,
    Accepting,
    Accepted,
    Setup,
    Running,
    Stopping,
    Stopped,
}

crate::simple_display! {
    JobStatus {
        New => "new",
        Accepting => "accepting",
        Accepted => "accepted",
        Setup => "setup",
        Running => "running",
        Stopping => "stopping",
        Stopped => "stopped",
    }
}

/// Upload progress counters, POSTed to the livelog's `upload_progress`
/// endpoint while livelog is active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub outstanding_files: u64,
    pub outstanding_images: u64,
    pub upload_up_to: Option<String>,
    pub upload_up_to_current_module: Option<String>,
}

/// Configuration for creating a new [`Job`].
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// The web UI's job id. `None` until the web UI has assigned one —
    /// `start()` requires it to be set.
    pub id: Option<u64>,
    /// Opaque job info from the web UI dispatch, including the subprocess's
    /// `URL` and, where known, its `BACKEND`.
    pub info: HashMap<String, Value>,
    pub worker_id: String,
    pub worker_hostname: String,
}

impl JobConfig {
    pub fn builder() -> JobConfigBuilder {
        JobConfigBuilder {
            id: None,
            info: HashMap::new(),
            worker_id: String::new(),
            worker_hostname: String::new(),
        }
    }
}

pub struct JobConfigBuilder {
    id: Option<u64>,
    info: HashMap<String, Value>,
    worker_id: String,
    worker_hostname: String,
}

impl JobConfigBuilder {
    crate::setters! {
        into {
            worker_id: String,
            worker_hostname: String,
        }
        set {
            info: HashMap<String, Value>,
        }
        option {
            id: u64,
        }
    }

    pub fn build(self) -> JobConfig {
        JobConfig { id: self.id, info: self.info, worker_id: self.worker_id, worker_hostname: self.worker_hostname }
    }
}

/// A job instance. One worker process runs at most one `Job` at a time; it
/// is single-use and is never restarted after reaching `Stopped`.
pub struct Job {
    pub id: Option<u64>,
    pub info: HashMap<String, Value>,
    pub status: JobStatus,
    pub setup_error: Option<String>,
    pub is_uploading_results: bool,
    pub livelog_viewers: u32,
    pub developer_session_running: bool,
    pub upload_progress: UploadProgress,

    /// Set once the `accepted` WebSocket message has been handed to the
    /// runtime. Backs invariant 6 (exactly one `accepted` message emitted).
    accepted_ws_sent: bool,
    /// Count of in-flight artifact uploads; `is_uploading_results` tracks
    /// `outstanding_uploads > 0`.
    outstanding_uploads: u32,
    worker_id: String,
    worker_hostname: String,

    job_id: JobId,
    events: EventBus<JobEvent>,
}

impl Job {
    pub fn new(config: JobConfig) -> Self {
        Self {
            id: config.id,
            info: config.info,
            status: JobStatus::New,
            setup_error: None,
            is_uploading_results: false,
            livelog_viewers: 0,
            developer_session_running: false,
            upload_progress: UploadProgress::default(),
            accepted_ws_sent: false,
            outstanding_uploads: 0,
            worker_id: config.worker_id,
            worker_hostname: config.worker_hostname,
            job_id: JobId::new(),
            events: EventBus::new(),
        }
    }

    /// Local correlation id, for logs and timer scoping. Not the web UI's
    /// job id — see [`Job::id`].
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Subscribe to `status_changed`/`uploading_results_concluded`.
    pub fn on(
        &mut self,
        name: &'static str,
        handler: impl FnMut(&JobEvent) + Send + 'static,
    ) -> crate::event::SubscriptionToken {
        self.events.on(name, handler)
    }

    fn set_status(&mut self, status: JobStatus) {
        self.status = status;
        self.events.emit("status_changed", JobEvent::StatusChanged { status });
    }

    fn require_id(&self) -> u64 {
        // Callers only reach the REST-emitting paths after `start()` has
        // already enforced `id.is_some()` via `JobError::MissingId`.
        self.id.unwrap_or_default()
    }

    /// Valid only from `New`. Transitions to `Accepting` and returns the
    /// effect to push `{jobid, type:"accepted"}` over the status websocket.
    /// The transition to `Accepted` happens in [`Job::on_accepted_sent`],
    /// once the runtime confirms the send went out.
    pub fn accept(&mut self) -> Result<Vec<Effect>, JobError> {
        if self.status != JobStatus::New {
            return Err(JobError::InvalidState);
        }
        self.set_status(JobStatus::Accepting);
        Ok(vec![Effect::SendAccepted { id: self.require_id() }])
    }

    /// Called once the `SendAccepted` effect from [`Job::accept`] completes.
    /// A no-op outside `Accepting` (e.g. the websocket already dropped the
    /// job to `Stopped` before the send was acknowledged).
    pub fn on_accepted_sent(&mut self) {
        if self.status != JobStatus::Accepting {
            return;
        }
        self.accepted_ws_sent = true;
        self.set_status(JobStatus::Accepted);
    }

    /// Whether the `accepted` websocket message has been emitted. Backs
    /// invariant 6.
    pub fn accepted_ws_sent(&self) -> bool {
        self.accepted_ws_sent
    }

    /// Handle the control websocket's `finish` signal. Fatal only while
    /// `Accepting` (the web UI never learned this worker owns the job);
    /// a no-op in every other state, including `New` and the terminal ones.
    pub fn handle_ws_finish(&mut self) {
        if self.status == JobStatus::Accepting {
            self.set_status(JobStatus::Stopped);
        }
    }

    /// Valid only from `Accepted`, and only once `id` is set. Transitions to
    /// `Setup` and returns the effect to start the `isotovideo` subprocess.
    pub fn start(&mut self) -> Result<Vec<Effect>, JobError> {
        if self.id.is_none() {
            return Err(JobError::MissingId);
        }
        if self.status != JobStatus::Accepted {
            return Err(JobError::InvalidState);
        }
        self.set_status(JobStatus::Setup);
        Ok(vec![Effect::SpawnEngine])
    }

    fn running_status_frame(&self) -> Value {
        let mut frame = serde_json::json!({
            "cmd_srv_url": self.info.get("URL").cloned().unwrap_or(Value::Null),
            "test_execution_paused": 0,
            "worker_hostname": self.worker_hostname,
            "worker_id": self.worker_id,
        });
        if self.livelog_viewers > 0 {
            if let Some(obj) = frame.as_object_mut() {
                obj.insert("log".into(), serde_json::json!({}));
                obj.insert("serial_log".into(), serde_json::json!({}));
                obj.insert("serial_terminal".into(), serde_json::json!({}));
            }
        }
        frame
    }

    /// Called once `engine_workit` reports the subprocess is up. A no-op
    /// outside `Setup` (e.g. the job was already stopped).
    pub fn on_engine_started(&mut self) -> Vec<Effect> {
        if self.status != JobStatus::Setup {
            return Vec::new();
        }
        self.set_status(JobStatus::Running);
        tracing::info!(job_id = ?self.id, "isotovideo has been started");
        vec![Effect::PostStatus { id: self.require_id(), status: self.running_status_frame() }]
    }

    /// Called when `engine_workit` reports `{error}`. Records `setup_error`,
    /// logs it, and routes through the normal stop path so the job still
    /// reports a terminal status and `set_done`.
    pub fn on_engine_error(&mut self, error: String, test_order: Vec<Value>) -> Vec<Effect> {
        if self.status != JobStatus::Setup {
            return Vec::new();
        }
        tracing::warn!("Unable to setup job {}: {}", self.require_id(), error);
        self.setup_error = Some(error);
        self.stop("setup_failed", test_order)
    }

    /// `isotovideo` exited without `stop()` having been called first —
    /// treated as an implicit `stop("died")`.
    pub fn on_engine_exit(&mut self, test_order: Vec<Value>) -> Vec<Effect> {
        self.stop("died", test_order)
    }

    /// Transitions any non-terminal status to `Stopping`, then immediately
    /// to `Stopped`, building the full effect sequence in between: an
    /// optional `upload_progress` snapshot (only while livelog is active —
    /// this precedes the upload-marker frame per the observed ordering,
    /// since the source format doesn't document an intended order), the
    /// `{uploading:1}` marker frame, the terminal status frame carrying
    /// `test_order`, `set_done`, and finally a `StopEngine` effect so the
    /// runtime always tears down the subprocess and its watchers — a no-op
    /// if the engine never started or already exited on its own. Idempotent:
    /// a no-op in `Stopping`/`Stopped`.
    pub fn stop(&mut self, reason: &str, test_order: Vec<Value>) -> Vec<Effect> {
        if matches!(self.status, JobStatus::Stopping | JobStatus::Stopped) {
            return Vec::new();
        }

        let id = self.require_id();
        self.set_status(JobStatus::Stopping);
        tracing::info!(job_id = ?self.id, reason, "stopping job");

        let mut effects = Vec::new();

        if self.livelog_viewers > 0 {
            effects.push(Effect::PostUploadProgress {
                id,
                progress: serde_json::to_value(&self.upload_progress).unwrap_or(Value::Null),
            });
        }

        effects.push(Effect::PostStatus {
            id,
            status: serde_json::json!({ "uploading": 1, "worker_id": self.worker_id }),
        });

        let result = match &self.setup_error {
            Some(error) => serde_json::json!({ "reason": error }),
            None => serde_json::json!({}),
        };
        effects.push(Effect::PostStatus {
            id,
            status: serde_json::json!({
                "backend": self.info.get("BACKEND").cloned().unwrap_or(Value::Null),
                "cmd_srv_url": self.info.get("URL").cloned().unwrap_or(Value::Null),
                "result": result,
                "test_execution_paused": 0,
                "test_order": test_order,
                "worker_hostname": self.worker_hostname,
                "worker_id": self.worker_id,
            }),
        });

        effects.push(Effect::PostSetDone { id });
        effects.push(Effect::StopEngine);

        self.set_status(JobStatus::Stopped);
        effects
    }

    /// Valid only while `status` is `Setup` or `Running`. Increments the
    /// reference count; on 0→1 arms the livelog timer.
    pub fn start_livelog(&mut self) -> Result<Vec<Effect>, JobError> {
        if !matches!(self.status, JobStatus::Setup | JobStatus::Running) {
            return Err(JobError::InvalidLivelogState);
        }
        self.livelog_viewers += 1;
        if self.livelog_viewers == 1 {
            tracing::info!(job_id = ?self.id, "Starting livelog");
            return Ok(vec![Effect::SetTimer { id: TimerId::livelog(), duration: LIVELOG_FRAME_INTERVAL }]);
        }
        Ok(Vec::new())
    }

    /// Decrements the livelog reference count; on 1→0 disarms the timer.
    /// Decrementing below zero is a programmer error.
    pub fn stop_livelog(&mut self) -> Result<Vec<Effect>, JobError> {
        if self.livelog_viewers == 0 {
            return Err(JobError::InvalidLivelogState);
        }
        self.livelog_viewers -= 1;
        if self.livelog_viewers == 0 {
            tracing::info!(job_id = ?self.id, "Stopping livelog");
            return Ok(vec![Effect::CancelTimer { id: TimerId::livelog() }]);
        }
        Ok(Vec::new())
    }

    /// Called by the runtime each time the livelog timer fires. A no-op if
    /// livelog was stopped since the timer was armed.
    pub fn on_livelog_tick(&mut self) -> Vec<Effect> {
        if self.livelog_viewers == 0 {
            return Vec::new();
        }
        vec![Effect::PostStatus { id: self.require_id(), status: self.running_status_frame() }]
    }

    pub fn start_developer_session(&mut self) {
        self.developer_session_running = true;
    }

    pub fn stop_developer_session(&mut self) {
        self.developer_session_running = false;
    }

    /// Marks one more artifact upload in flight.
    pub fn note_upload_started(&mut self) {
        self.outstanding_uploads += 1;
        self.is_uploading_results = true;
    }

    /// Marks one artifact upload as finished. Returns `true` exactly when
    /// this was the last outstanding upload, i.e. when the caller should
    /// emit `uploading_results_concluded` and, on the success path, call
    /// [`Job::stop`] with `"done"`.
    ///
    /// Unlike `status_changed`, this reaction isn't wired through the
    /// job's own [`EventBus`] subscription: a self-subscribing handler
    /// would need `&mut Job` access from inside a closure the `Job` itself
    /// owns. The runtime drives the `stop("done", ..)` call directly off
    /// this return value instead; external subscribers still observe the
    /// event via `emit`.
    pub fn note_upload_finished(&mut self) -> bool {
        self.outstanding_uploads = self.outstanding_uploads.saturating_sub(1);
        if self.outstanding_uploads == 0 {
            self.is_uploading_results = false;
            self.events.emit("uploading_results_concluded", JobEvent::UploadingResultsConcluded);
            true
        } else {
            false
        }
    }

    pub fn outstanding_uploads(&self) -> u32 {
        self.outstanding_uploads
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        option {
            id: u64 = None,
        }
        set {
            info: HashMap<String, Value> = HashMap::new(),
            status: JobStatus = JobStatus::New,
            setup_error: Option<String> = None,
            is_uploading_results: bool = false,
            livelog_viewers: u32 = 0,
            developer_session_running: bool = false,
            upload_progress: UploadProgress = UploadProgress::default(),
            accepted_ws_sent: bool = false,
            outstanding_uploads: u32 = 0,
        }
        into {
            worker_id: String = "worker1",
            worker_hostname: String = "worker1.example.test",
        }
        computed {
            job_id: JobId = JobId::new(),
            events: EventBus<JobEvent> = EventBus::new(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;

//! `JobRuntime`: the single task that owns a [`Job`] for its whole life.
//!
//! Mirrors the teacher's single-threaded-reactor design note in `spec.md`
//! §9 mapped onto tokio: external events (WebSocket close, subprocess
//! exit, livelog/developer-session requests, upload completions) are
//! funneled through one `mpsc` mailbox so `Job` mutation only ever
//! happens on the task that owns the receiver. `execute`/`execute_inner`
//! follows the same tracing-span-around-effect shape as the teacher's
//! `engine::executor::Executor::execute`.

use crate::error::RuntimeError;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use wj_adapters::{Client, EngineHandle, HttpMethod, IsotovideoClient, PoolDirectory};
use wj_core::{Effect, Job, JobConfig, JobStatus, TimerId};

/// External arrivals fed into the [`JobRuntime`]'s mailbox. Production
/// code sends these from the WebSocket read loop, the engine supervisor
/// task, and whatever surfaces livelog/developer-session/upload requests
/// from the web UI (out of scope for this core, per `spec.md` §1).
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    WsFinished,
    EngineStarted,
    EngineError(String),
    EngineExited,
    TimerFired(TimerId),
    StartLivelog,
    StopLivelog,
    StartDeveloperSession,
    StopDeveloperSession,
    UploadStarted,
    UploadFinished,
}

/// Drives one [`Job`] end to end: accepts it, spawns `isotovideo` on
/// `start()`, and executes every [`Effect`] the state machine returns
/// against the real `Client`/engine adapters until the job reaches
/// [`JobStatus::Stopped`].
pub struct JobRuntime {
    job: Job,
    client: Arc<dyn Client>,
    isotovideo: Arc<dyn IsotovideoClient>,
    pool: PoolDirectory,
    engine: Arc<AsyncMutex<Option<EngineHandle>>>,
    engine_running: Arc<AtomicBool>,
    isotovideo_poll_interval: Duration,
    timers: HashMap<TimerId, JoinHandle<()>>,
    mailbox: mpsc::Receiver<RuntimeEvent>,
    sender: mpsc::Sender<RuntimeEvent>,
}

impl JobRuntime {
    pub fn new(
        job: Job,
        client: Arc<dyn Client>,
        isotovideo: Arc<dyn IsotovideoClient>,
        pool: PoolDirectory,
        isotovideo_poll_interval: Duration,
    ) -> Self {
        let (sender, mailbox) = mpsc::channel(32);
        Self {
            job,
            client,
            isotovideo,
            pool,
            engine: Arc::new(AsyncMutex::new(None)),
            engine_running: Arc::new(AtomicBool::new(false)),
            isotovideo_poll_interval,
            timers: HashMap::new(),
            mailbox,
            sender,
        }
    }

    /// A clone of the mailbox's sender, for wiring up the WebSocket read
    /// loop or any other external event source ahead of [`JobRuntime::run`].
    pub fn sender(&self) -> mpsc::Sender<RuntimeEvent> {
        self.sender.clone()
    }

    /// Runs the job to completion: `accept()`, then pumps the mailbox
    /// until `status` is `Stopped`. Returns the finished `Job` so the
    /// caller can inspect its final bookkeeping (e.g. in tests).
    pub async fn run(mut self) -> Result<Job, RuntimeError> {
        self.accept().await?;

        while self.job.status != JobStatus::Stopped {
            match self.mailbox.recv().await {
                Some(event) => self.dispatch(event).await?,
                None => break,
            }
        }

        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        Ok(self.job)
    }

    /// The job's current status. Mainly useful to callers driving the
    /// runtime step by step instead of through [`JobRuntime::run`].
    pub fn status(&self) -> JobStatus {
        self.job.status
    }

    /// Runs `Job::accept()` and executes the effects it returns.
    pub async fn accept(&mut self) -> Result<(), RuntimeError> {
        let effects = self.job.accept()?;
        self.execute_all(effects).await
    }

    /// Call once `start()` has been invoked externally (the web UI's job
    /// dispatch isn't modeled here — see `spec.md` §1's non-goals); drives
    /// `Job::start()` and executes its effects.
    pub async fn start(&mut self) -> Result<(), RuntimeError> {
        let effects = self.job.start()?;
        self.execute_all(effects).await
    }

    /// Feeds one external event through the `Job` and executes whatever
    /// effects it returns, without going through the mailbox. [`JobRuntime::run`]
    /// uses this internally for events it receives from its own mailbox;
    /// exposed directly so callers (and tests) can drive the runtime one
    /// event at a time.
    pub async fn dispatch(&mut self, event: RuntimeEvent) -> Result<(), RuntimeError> {
        let effects = self.handle_event(event).await?;
        self.execute_all(effects).await
    }

    async fn handle_event(&mut self, event: RuntimeEvent) -> Result<Vec<Effect>, RuntimeError> {
        match event {
            RuntimeEvent::WsFinished => {
                self.job.handle_ws_finish();
                Ok(Vec::new())
            }
            RuntimeEvent::EngineStarted => Ok(self.job.on_engine_started()),
            RuntimeEvent::EngineError(error) => {
                let test_order = self.pool.test_order().await;
                Ok(self.job.on_engine_error(error, test_order))
            }
            RuntimeEvent::EngineExited => {
                let test_order = self.pool.test_order().await;
                Ok(self.job.on_engine_exit(test_order))
            }
            RuntimeEvent::TimerFired(id) if id == TimerId::livelog() => Ok(self.job.on_livelog_tick()),
            RuntimeEvent::TimerFired(_) => Ok(Vec::new()),
            RuntimeEvent::StartLivelog => Ok(self.job.start_livelog().unwrap_or_else(|error| {
                tracing::warn!(%error, "start_livelog rejected");
                Vec::new()
            })),
            RuntimeEvent::StopLivelog => Ok(self.job.stop_livelog().unwrap_or_else(|error| {
                tracing::warn!(%error, "stop_livelog rejected");
                Vec::new()
            })),
            RuntimeEvent::StartDeveloperSession => {
                self.job.start_developer_session();
                Ok(Vec::new())
            }
            RuntimeEvent::StopDeveloperSession => {
                self.job.stop_developer_session();
                Ok(Vec::new())
            }
            RuntimeEvent::UploadStarted => {
                self.job.note_upload_started();
                Ok(Vec::new())
            }
            RuntimeEvent::UploadFinished => {
                if self.job.note_upload_finished() {
                    let test_order = self.pool.test_order().await;
                    Ok(self.job.stop("done", test_order))
                } else {
                    Ok(Vec::new())
                }
            }
        }
    }

    async fn execute_all(&mut self, effects: Vec<Effect>) -> Result<(), RuntimeError> {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            let more = self.execute(effect).await?;
            queue.extend(more);
        }
        Ok(())
    }

    async fn execute(&mut self, effect: Effect) -> Result<Vec<Effect>, RuntimeError> {
        let name = effect.name();
        let fields = effect.fields();
        let verbose = effect.verbose();
        if verbose {
            tracing::info!(effect = name, ?fields, "executing effect");
        }

        let start = std::time::Instant::now();
        let result = self.execute_inner(effect).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) if verbose => tracing::info!(effect = name, elapsed_ms, "effect completed"),
            Ok(_) => tracing::debug!(effect = name, elapsed_ms, "effect completed"),
            Err(error) => tracing::error!(effect = name, elapsed_ms, %error, "effect failed"),
        }
        result
    }

    async fn execute_inner(&mut self, effect: Effect) -> Result<Vec<Effect>, RuntimeError> {
        match effect {
            Effect::PostStatus { id, status } => {
                let body = serde_json::json!({ "status": status });
                self.client.send(HttpMethod::Post, &format!("jobs/{id}/status"), Some(body)).await?;
                Ok(Vec::new())
            }
            Effect::PostSetDone { id } => {
                self.client.send(HttpMethod::Post, &format!("jobs/{id}/set_done"), None).await?;
                Ok(Vec::new())
            }
            Effect::PostUploadProgress { id, progress } => {
                let path = format!("liveviewhandler/api/v1/jobs/{id}/upload_progress");
                self.client.send(HttpMethod::Post, &path, Some(progress)).await?;
                Ok(Vec::new())
            }
            Effect::SendAccepted { id } => {
                let message = serde_json::json!({ "jobid": id, "type": "accepted" });
                self.client.send_status(message).await?;
                self.job.on_accepted_sent();
                Ok(Vec::new())
            }
            Effect::SpawnEngine => self.spawn_engine().await,
            Effect::StopEngine => {
                self.stop_engine().await;
                Ok(Vec::new())
            }
            Effect::SetTimer { id, duration } => {
                self.arm_timer(id, duration);
                Ok(Vec::new())
            }
            Effect::CancelTimer { id } => {
                self.disarm_timer(id);
                Ok(Vec::new())
            }
        }
    }

    async fn spawn_engine(&mut self) -> Result<Vec<Effect>, RuntimeError> {
        self.pool.prepare_for_run().await?;
        let url = self.job.info.get("URL").and_then(Value::as_str).unwrap_or_default().to_string();

        match wj_adapters::engine_workit(self.pool.path(), &url).await {
            Ok(handle) => {
                *self.engine.lock().await = Some(handle);
                self.engine_running.store(true, Ordering::SeqCst);
                self.spawn_engine_watcher();
                self.spawn_isotovideo_poller();
                Ok(self.job.on_engine_started())
            }
            Err(message) => {
                let test_order = self.pool.test_order().await;
                Ok(self.job.on_engine_error(message, test_order))
            }
        }
    }

    async fn stop_engine(&mut self) {
        self.engine_running.store(false, Ordering::SeqCst);
        if let Some(mut handle) = self.engine.lock().await.take() {
            if let Err(error) = handle.stop().await {
                tracing::warn!(%error, "failed to stop isotovideo");
            }
        }
    }

    /// Watches the subprocess for an unexpected exit and reports it back
    /// through the mailbox as an implicit `stop("died")`.
    fn spawn_engine_watcher(&self) {
        let engine = self.engine.clone();
        let running = self.engine_running.clone();
        let sender = self.sender.clone();
        let poll_interval = self.isotovideo_poll_interval;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(poll_interval).await;
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                let mut guard = engine.lock().await;
                let exited = match guard.as_mut() {
                    Some(handle) => !handle.is_running(),
                    None => break,
                };
                if exited {
                    *guard = None;
                    drop(guard);
                    running.store(false, Ordering::SeqCst);
                    let _ = sender.send(RuntimeEvent::EngineExited).await;
                    break;
                }
            }
        });
    }

    /// Polls the runner's own status endpoint purely for observability —
    /// the core state machine doesn't react to it (`spec.md` §4.2 leaves
    /// the snapshot's interpretation to the caller, and nothing in §4.3
    /// conditions a transition on it).
    fn spawn_isotovideo_poller(&self) {
        let isotovideo = self.isotovideo.clone();
        let running = self.engine_running.clone();
        let poll_interval = self.isotovideo_poll_interval;
        tokio::spawn(async move {
            while running.load(Ordering::SeqCst) {
                tokio::time::sleep(poll_interval).await;
                let snapshot = isotovideo.status().await;
                if !snapshot.0.is_empty() {
                    tracing::debug!(?snapshot, "isotovideo status");
                }
            }
        });
    }

    fn arm_timer(&mut self, id: TimerId, duration: Duration) {
        let sender = self.sender.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(duration).await;
                if sender.send(RuntimeEvent::TimerFired(id)).await.is_err() {
                    break;
                }
            }
        });
        self.timers.insert(id, handle);
    }

    fn disarm_timer(&mut self, id: TimerId) {
        if let Some(handle) = self.timers.remove(&id) {
            handle.abort();
        }
    }
}

/// Builds a [`Job`] and its [`JobRuntime`] together, so callers don't have
/// to construct a bare `Job` and separately wire a runtime around it.
pub fn spawn_job_runtime(
    config: JobConfig,
    client: Arc<dyn Client>,
    isotovideo: Arc<dyn IsotovideoClient>,
    pool: PoolDirectory,
    isotovideo_poll_interval: Duration,
) -> JobRuntime {
    JobRuntime::new(Job::new(config), client, isotovideo, pool, isotovideo_poll_interval)
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;

//! `WorkerContext`: the parent container a worker process builds once at
//! startup and that every `JobRuntime` it spawns borrows from — instance
//! number, settings, and the pool directory. At most one job runs per
//! worker instance at a time, so the "current job" reference is just
//! whichever job id the last-started `JobRuntime` was given.

use crate::settings::Settings;
use std::sync::atomic::{AtomicU64, Ordering};
use wj_adapters::PoolDirectory;

pub struct WorkerContext {
    pub instance: u32,
    pub settings: Settings,
    pub pool: PoolDirectory,
    current_job_id: AtomicU64,
}

impl WorkerContext {
    pub fn new(settings: Settings) -> Self {
        let instance = settings.worker_instance;
        let pool = PoolDirectory::new(settings.pool_dir.clone());
        Self { instance, settings, pool, current_job_id: AtomicU64::new(0) }
    }

    /// The web UI job id of the job currently bound to this instance, if
    /// any. `0` is used as the "none" sentinel since `0` is never a valid
    /// web UI job id.
    pub fn current_job_id(&self) -> Option<u64> {
        match self.current_job_id.load(Ordering::SeqCst) {
            0 => None,
            id => Some(id),
        }
    }

    pub fn set_current_job_id(&self, id: Option<u64>) {
        self.current_job_id.store(id.unwrap_or(0), Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

//! Starts and supervises the `isotovideo` subprocess.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

/// A running `isotovideo` subprocess.
pub struct EngineHandle {
    pid: u32,
    child: Child,
}

impl EngineHandle {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Non-blocking liveness check.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    pub async fn stop(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }

    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }
}

/// Starts the `isotovideo` subprocess for a job. `job_url` is the URL the
/// subprocess reports status to (the job's `info["URL"]`); `pool_dir` is
/// its working directory. Returns `Err` with a message on spawn failure;
/// no subprocess is running in that case.
pub async fn engine_workit(pool_dir: &Path, job_url: &str) -> Result<EngineHandle, String> {
    let mut command = Command::new("isotovideo");
    command
        .current_dir(pool_dir)
        .env("OPENQA_URL", job_url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let child = command.spawn().map_err(|error| error.to_string())?;
    let pid = child.id().ok_or_else(|| "isotovideo exited before reporting a pid".to_string())?;
    Ok(EngineHandle { pid, child })
}

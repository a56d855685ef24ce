//! Per-worker-instance scratch directory holding logs and `testresults/`.

use std::path::{Path, PathBuf};

/// Scoped working directory for the currently-active job. Mutated only by
/// that job; never shared across jobs since a worker instance runs at most
/// one at a time.
pub struct PoolDirectory {
    root: PathBuf,
}

impl PoolDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn autoinst_log(&self) -> PathBuf {
        self.root.join("autoinst-log.txt")
    }

    fn worker_log(&self) -> PathBuf {
        self.root.join("worker-log.txt")
    }

    fn test_order_path(&self) -> PathBuf {
        self.root.join("testresults").join("test_order.json")
    }

    /// Prepares the directory for a fresh run: drops any `autoinst-log.txt`
    /// left by a previous job and creates an empty `worker-log.txt`.
    /// `testresults/` is left untouched for the runner to populate.
    pub async fn prepare_for_run(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let autoinst_log = self.autoinst_log();
        if tokio::fs::try_exists(&autoinst_log).await? {
            tokio::fs::remove_file(&autoinst_log).await?;
        }
        tokio::fs::write(self.worker_log(), b"").await
    }

    /// Reads `testresults/test_order.json`, or `[]` if it's absent or
    /// unparseable.
    pub async fn test_order(&self) -> Vec<serde_json::Value> {
        match tokio::fs::read(self.test_order_path()).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;

//! `wjd` — the worker daemon binary.
//!
//! Job dispatch from the web UI (how a `JobConfig` actually arrives at
//! this process) is an external collaborator the core lifecycle doesn't
//! model — see `spec.md` §1's non-goals. This entry point only wires up
//! the ambient stack: settings, logging, and the `WorkerContext` every
//! `JobRuntime` this process spawns is built from.

use std::path::PathBuf;
use wj_worker::{logging, Settings, WorkerContext};

fn settings_path() -> Option<PathBuf> {
    std::env::var_os("WJ_SETTINGS_FILE").map(PathBuf::from)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let settings = Settings::from_file_and_env(settings_path().as_deref())?;
    let context = WorkerContext::new(settings);

    tracing::info!(
        instance = context.instance,
        pool_dir = %context.pool.path().display(),
        web_ui = %context.settings.web_ui_base_url,
        "wjd ready"
    );

    Ok(())
}

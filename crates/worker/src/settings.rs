//! Worker settings: an optional TOML file plus `WJ_*` environment
//! overrides, in the spirit of the teacher's `daemon::env` variable
//! resolution, but loaded into a single serde-deserialized struct instead
//! of ad hoc `std::env::var` calls scattered across the binary.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read { path: String, #[source] source: std::io::Error },
    #[error("failed to parse settings file {path}: {source}")]
    Parse { path: String, #[source] source: toml::de::Error },
}

/// Worker-level configuration. Out of scope per the core lifecycle's
/// non-goals, but still required and testable as part of the ambient
/// stack: web UI endpoints, this instance's pool directory, and the two
/// polling cadences the runtime drives the `Job` with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub web_ui_base_url: String,
    pub web_ui_ws_url: String,
    pub worker_instance: u32,
    pub pool_dir: PathBuf,
    pub isotovideo_poll_ms: u64,
    pub livelog_frame_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            web_ui_base_url: "http://localhost".to_string(),
            web_ui_ws_url: "ws://localhost/ws".to_string(),
            worker_instance: 1,
            pool_dir: PathBuf::from("/var/lib/wj-worker/pool"),
            isotovideo_poll_ms: 1000,
            livelog_frame_ms: wj_core::LIVELOG_FRAME_INTERVAL.as_millis() as u64,
        }
    }
}

impl Settings {
    /// Loads `path` if given and present, falling back to defaults
    /// otherwise, then applies `WJ_*` environment overrides on top.
    pub fn from_file_and_env(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path)
                    .map_err(|source| SettingsError::Read { path: path.display().to_string(), source })?;
                toml::from_str(&text)
                    .map_err(|source| SettingsError::Parse { path: path.display().to_string(), source })?
            }
            _ => Settings::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("WJ_WEB_UI_BASE_URL") {
            self.web_ui_base_url = url;
        }
        if let Ok(url) = std::env::var("WJ_WEB_UI_WS_URL") {
            self.web_ui_ws_url = url;
        }
        if let Some(instance) = env_parsed("WJ_WORKER_INSTANCE") {
            self.worker_instance = instance;
        }
        if let Ok(dir) = std::env::var("WJ_POOL_DIR") {
            self.pool_dir = PathBuf::from(dir);
        }
        if let Some(ms) = env_parsed("WJ_ISOTOVIDEO_POLL_MS") {
            self.isotovideo_poll_ms = ms;
        }
        if let Some(ms) = env_parsed("WJ_LIVELOG_FRAME_MS") {
            self.livelog_frame_ms = ms;
        }
    }

    pub fn isotovideo_poll_interval(&self) -> Duration {
        Duration::from_millis(self.isotovideo_poll_ms)
    }

    pub fn livelog_frame_interval(&self) -> Duration {
        Duration::from_millis(self.livelog_frame_ms)
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

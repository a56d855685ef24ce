//! Thin REST client to the `isotovideo` test-runner subprocess.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The runner's self-reported execution snapshot. Empty when it has
/// nothing new to report — never an error, since a quiet runner isn't
/// itself a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsotovideoSnapshot(pub serde_json::Map<String, Value>);

#[async_trait]
pub trait IsotovideoClient: Send + Sync {
    async fn status(&self) -> IsotovideoSnapshot;
    async fn stop(&self);
}

/// `IsotovideoClient` backed by the runner's local REST status API.
pub struct HttpIsotovideoClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIsotovideoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl IsotovideoClient for HttpIsotovideoClient {
    async fn status(&self) -> IsotovideoSnapshot {
        match self.http.get(self.url("status")).send().await {
            Ok(response) => response.json().await.unwrap_or_default(),
            Err(error) => {
                tracing::warn!(%error, "isotovideo status poll failed");
                IsotovideoSnapshot::default()
            }
        }
    }

    async fn stop(&self) {
        let body = serde_json::json!({ "cmd": "stop_waitforneedle" });
        if let Err(error) = self.http.post(self.url("command")).json(&body).send().await {
            tracing::warn!(%error, "isotovideo stop request failed");
        }
    }
}

#[cfg(test)]
#[path = "isotovideo_tests.rs"]
mod tests;

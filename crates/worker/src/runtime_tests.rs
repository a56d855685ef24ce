use super::*;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::tempdir;
use wj_adapters::mock::{MockClient, MockIsotovideoClient, RecordedCall};
use wj_core::{JobConfig, JobError};

fn config(id: Option<u64>, url: &str) -> JobConfig {
    let mut info = HashMap::new();
    info.insert("URL".to_string(), serde_json::json!(url));
    let mut builder = JobConfig::builder().info(info).worker_id("worker1").worker_hostname("worker1.example.test");
    if let Some(id) = id {
        builder = builder.id(id);
    }
    builder.build()
}

fn harness(id: Option<u64>) -> (JobRuntime, MockClient) {
    let dir = tempdir().unwrap();
    let client = MockClient::new();
    let isotovideo = MockIsotovideoClient::new();
    let pool = wj_adapters::PoolDirectory::new(dir.path());
    std::mem::forget(dir); // keep the tempdir alive for the runtime's lifetime
    let runtime = JobRuntime::new(
        Job::new(config(id, "http://openqa.example/job")),
        Arc::new(client.clone()),
        Arc::new(isotovideo),
        pool,
        Duration::from_millis(20),
    );
    (runtime, client)
}

#[tokio::test]
async fn accept_then_ws_drop_leaves_status_accepted_with_only_the_accepted_message() {
    let (mut runtime, client) = harness(Some(1));

    runtime.accept().await.unwrap();
    assert_eq!(runtime.status(), JobStatus::Accepted);

    runtime.dispatch(RuntimeEvent::WsFinished).await.unwrap();
    assert_eq!(runtime.status(), JobStatus::Accepted);

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        RecordedCall::Status(payload) => {
            assert_eq!(payload["jobid"], 1);
            assert_eq!(payload["type"], "accepted");
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn start_without_id_fails_with_missing_id_and_sends_nothing() {
    let (mut runtime, client) = harness(None);

    let error = runtime.start().await.unwrap_err();
    assert!(matches!(error, RuntimeError::Job(JobError::MissingId)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn engine_spawn_failure_cleans_the_pool_and_posts_the_stop_sequence() {
    let dir = tempdir().unwrap();
    tokio::fs::write(dir.path().join("autoinst-log.txt"), b"stale").await.unwrap();
    let testresults = dir.path().join("testresults");
    tokio::fs::create_dir_all(&testresults).await.unwrap();
    tokio::fs::write(testresults.join("test_order.json"), b"[]").await.unwrap();

    let client = MockClient::new();
    let isotovideo = MockIsotovideoClient::new();
    let pool = wj_adapters::PoolDirectory::new(dir.path());
    let mut runtime = JobRuntime::new(
        Job::new(config(Some(3), "http://openqa.example/job")),
        Arc::new(client.clone()),
        Arc::new(isotovideo),
        pool,
        Duration::from_millis(20),
    );

    runtime.accept().await.unwrap();
    runtime.start().await.unwrap();

    assert_eq!(runtime.status(), JobStatus::Stopped);
    assert!(!dir.path().join("autoinst-log.txt").exists());
    assert!(dir.path().join("worker-log.txt").exists());

    let rest_calls: Vec<_> = client
        .calls()
        .into_iter()
        .filter(|call| matches!(call, RecordedCall::Rest { .. }))
        .collect();
    assert_eq!(rest_calls.len(), 3);
    assert!(matches!(&rest_calls[0], RecordedCall::Rest { path, .. } if path == "jobs/3/status"));
    assert!(matches!(&rest_calls[1], RecordedCall::Rest { path, .. } if path == "jobs/3/status"));
    assert!(matches!(&rest_calls[2], RecordedCall::Rest { path, json: None, .. } if path == "jobs/3/set_done"));

    match &rest_calls[1] {
        RecordedCall::Rest { json: Some(body), .. } => {
            let status = &body["status"];
            assert_eq!(status["test_order"], serde_json::json!([]));
            assert!(status["result"]["reason"].is_string());
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn developer_session_toggles_without_touching_the_network() {
    let (mut runtime, client) = harness(Some(5));

    runtime.dispatch(RuntimeEvent::StartDeveloperSession).await.unwrap();
    runtime.dispatch(RuntimeEvent::StopDeveloperSession).await.unwrap();

    assert!(client.calls().is_empty());
}

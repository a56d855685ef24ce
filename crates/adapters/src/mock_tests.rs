use super::*;

#[tokio::test]
async fn records_calls_in_submission_order() {
    let client = MockClient::new();
    client.send(HttpMethod::Post, "jobs/1/status", Some(serde_json::json!({"uploading": 1}))).await.unwrap();
    client.register().await.unwrap();
    client.send(HttpMethod::Post, "jobs/1/set_done", None).await.unwrap();

    let calls = client.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(&calls[0], RecordedCall::Rest { path, .. } if path == "jobs/1/status"));
    assert_eq!(calls[1], RecordedCall::Register);
    assert!(matches!(&calls[2], RecordedCall::Rest { path, json: None, .. } if path == "jobs/1/set_done"));
}

#[tokio::test]
async fn finished_resolves_after_close() {
    let client = MockClient::new();
    client.close();
    client.finished().await;
}

#[tokio::test]
async fn mock_isotovideo_client_returns_the_set_snapshot() {
    let engine = MockIsotovideoClient::new();
    let mut map = serde_json::Map::new();
    map.insert("running".into(), serde_json::json!("boot"));
    engine.set_snapshot(IsotovideoSnapshot(map));

    let snapshot = engine.status().await;
    assert_eq!(snapshot.0.get("running").unwrap(), "boot");
}

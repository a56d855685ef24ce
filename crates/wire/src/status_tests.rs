use super::*;

#[test]
fn accepted_message_serializes_to_the_expected_shape() {
    let msg = AcceptedMessage::new(42);
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json, serde_json::json!({ "jobid": 42, "type": "accepted" }));
}

#[test]
fn running_frame_omits_livelog_fields_by_default() {
    let frame = RunningStatusFrame {
        cmd_srv_url: Value::String("http://localhost:20013".into()),
        test_execution_paused: 0,
        worker_hostname: "host1".into(),
        worker_id: "1".into(),
        log: None,
        serial_log: None,
        serial_terminal: None,
    };
    let json = serde_json::to_value(&frame).unwrap();
    assert!(json.get("log").is_none());
}

#[test]
fn running_frame_includes_livelog_fields_when_present() {
    let frame = RunningStatusFrame {
        cmd_srv_url: Value::Null,
        test_execution_paused: 0,
        worker_hostname: "host1".into(),
        worker_id: "1".into(),
        log: Some(serde_json::json!({})),
        serial_log: Some(serde_json::json!({})),
        serial_terminal: Some(serde_json::json!({})),
    };
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["log"], serde_json::json!({}));
}

#[test]
fn upload_marker_frame_round_trips() {
    let frame = UploadMarkerFrame { uploading: 1, worker_id: "1" };
    let json = serde_json::to_value(frame).unwrap();
    assert_eq!(json, serde_json::json!({ "uploading": 1, "worker_id": "1" }));
}

#[test]
fn terminal_frame_round_trips() {
    let frame = TerminalStatusFrame {
        backend: Value::Null,
        cmd_srv_url: Value::Null,
        result: serde_json::json!({}),
        test_execution_paused: 0,
        test_order: vec![],
        worker_hostname: "host1".into(),
        worker_id: "1".into(),
    };
    let json = serde_json::to_string(&frame).unwrap();
    let back: TerminalStatusFrame = serde_json::from_str(&json).unwrap();
    assert_eq!(back, frame);
}

use super::*;

#[test]
fn names_are_stable_snake_case() {
    assert_eq!(Effect::PostSetDone { id: 1 }.name(), "post_set_done");
    assert_eq!(Effect::SpawnEngine.name(), "spawn_engine");
}

#[test]
fn fields_carry_the_job_id() {
    let effect = Effect::PostStatus { id: 42, status: serde_json::json!({}) };
    assert_eq!(effect.fields(), vec![("job_id", "42".to_string())]);
}

#[test]
fn timer_effects_are_quiet() {
    assert!(!Effect::SetTimer { id: TimerId::livelog(), duration: Duration::from_secs(1) }.verbose());
    assert!(!Effect::CancelTimer { id: TimerId::livelog() }.verbose());
    assert!(Effect::SpawnEngine.verbose());
}

#[test]
fn duration_round_trips_as_millis() {
    let effect = Effect::SetTimer { id: TimerId::livelog(), duration: Duration::from_millis(2500) };
    let json = serde_json::to_string(&effect).expect("serialize");
    assert!(json.contains("2500"));
    let parsed: Effect = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, effect);
}

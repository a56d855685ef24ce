use super::*;

#[test]
fn timer_id_display() {
    let id = TimerId::from_string("tmr-test");
    assert_eq!(id.to_string(), "tmr-test");
}

#[test]
fn timer_id_equality() {
    let id1 = TimerId::from_string("tmr-1");
    let id2 = TimerId::from_string("tmr-1");
    let id3 = TimerId::from_string("tmr-2");

    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
}

#[test]
fn timer_id_serde() {
    let id = TimerId::from_string("tmr-livelog");
    let json = serde_json::to_string(&id).expect("serialize");
    assert_eq!(json, "\"tmr-livelog\"");

    let parsed: TimerId = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, id);
}

#[test]
fn livelog_is_a_stable_well_known_id() {
    assert_eq!(TimerId::livelog(), TimerId::livelog());
    assert_eq!(TimerId::livelog().as_str(), "tmr-livelog");
}

use super::*;
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn handlers_fire_in_subscription_order() {
    let mut bus: EventBus<u32> = EventBus::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let o1 = order.clone();
    bus.on("tick", move |v| o1.lock().push(("a", *v)));
    let o2 = order.clone();
    bus.on("tick", move |v| o2.lock().push(("b", *v)));

    bus.emit("tick", 7);

    assert_eq!(*order.lock(), vec![("a", 7), ("b", 7)]);
}

#[test]
fn once_handler_fires_a_single_time() {
    let mut bus: EventBus<()> = EventBus::new();
    let count = Arc::new(Mutex::new(0));
    let c = count.clone();
    bus.once("done", move |_| *c.lock() += 1);

    bus.emit("done", ());
    bus.emit("done", ());

    assert_eq!(*count.lock(), 1);
    assert_eq!(bus.subscriber_count("done"), 0);
}

#[test]
fn unsubscribe_removes_the_handler() {
    let mut bus: EventBus<()> = EventBus::new();
    let count = Arc::new(Mutex::new(0));
    let c = count.clone();
    let token = bus.on("x", move |_| *c.lock() += 1);

    bus.unsubscribe("x", token);
    bus.emit("x", ());

    assert_eq!(*count.lock(), 0);
}

#[test]
fn emit_on_unknown_name_is_a_no_op() {
    let mut bus: EventBus<()> = EventBus::new();
    bus.emit("nothing-subscribed", ());
}

#[test]
fn distinct_subscriptions_get_distinct_tokens() {
    let mut bus: EventBus<()> = EventBus::new();
    let t1 = bus.on("a", |_| {});
    let t2 = bus.on("a", |_| {});
    assert_ne!(t1, t2);
}

//! Pattern-matching behavior across the public surface.

use std::sync::{Arc, Mutex};

use topicbus::testing::CountingListener;
use topicbus::{Event, Reply, TopicBus};

#[test]
fn exact_listeners_fire_in_registration_order() {
    let bus: TopicBus<u32> = TopicBus::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        bus.on("job.done", move |_event: &Event<u32>| {
            order.lock().unwrap().push(tag);
            Reply::ok(())
        });
    }

    bus.emit(Event::new("job.done", 1), false).unwrap();
    assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
}

#[test]
fn star_matches_exactly_one_segment() {
    let bus: TopicBus<u32> = TopicBus::new();
    let counter = CountingListener::new();
    bus.on_shared("a.*.c", &counter.listener());

    bus.emit(Event::new("a.b.c", 0), false).unwrap();
    assert_eq!(counter.count(), 1);

    bus.emit(Event::new("a.b.b.c", 0), false).unwrap();
    bus.emit(Event::new("a.c", 0), false).unwrap();
    assert_eq!(counter.count(), 1);
}

#[test]
fn rest_wildcard_collapses_the_remainder() {
    let bus: TopicBus<u32> = TopicBus::new();
    let counter = CountingListener::new();
    bus.on_shared("a.**", &counter.listener());

    for topic in ["a", "a.b", "a.b.c.d"] {
        bus.emit(Event::new(topic, 0), false).unwrap();
    }
    assert_eq!(counter.count(), 3);

    bus.emit(Event::new("b.a", 0), false).unwrap();
    assert_eq!(counter.count(), 3);
}

#[test]
fn on_any_receives_every_topic() {
    let bus: TopicBus<u32> = TopicBus::new();
    let counter = CountingListener::new();
    bus.on_any_shared(&counter.listener());

    bus.emit(Event::new("", 0), false).unwrap();
    bus.emit(Event::new("x", 0), false).unwrap();
    bus.emit(Event::new("x.y.z", 0), false).unwrap();
    assert_eq!(counter.count(), 3);
}

#[test]
fn pattern_suffix_after_rest_wildcard_never_fires() {
    let bus: TopicBus<u32> = TopicBus::new();
    let counter = CountingListener::new();
    bus.on_shared("a.**.c", &counter.listener());

    bus.emit(Event::new("a.b.c", 0), false).unwrap();
    bus.emit(Event::new("a.c", 0), false).unwrap();
    assert_eq!(counter.count(), 0);
}

#[test]
fn matching_order_is_exact_then_star_then_rest() {
    let bus: TopicBus<u32> = TopicBus::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for (pattern, tag) in [("a.b", "exact"), ("a.*", "star"), ("**", "any")] {
        let order = Arc::clone(&order);
        bus.on(pattern, move |_event: &Event<u32>| {
            order.lock().unwrap().push(tag);
            Reply::ok(())
        });
    }

    bus.emit(Event::new("a.b", 0), false).unwrap();
    assert_eq!(*order.lock().unwrap(), ["exact", "star", "any"]);
}

#[test]
fn one_topic_can_match_several_nodes_at_the_same_depth() {
    let bus: TopicBus<u32> = TopicBus::new();
    let counter = CountingListener::new();
    bus.on_shared("sys.err", &counter.listener());
    bus.on_shared("sys.*", &counter.listener());

    bus.emit(Event::new("sys.err", 0), false).unwrap();
    assert_eq!(counter.count(), 2);
}

#[test]
fn delimiter_is_fixed_per_instance() {
    let bus: TopicBus<u32> = TopicBus::with_delimiter("/");
    let slash = CountingListener::new();
    let dot = CountingListener::new();
    bus.on_shared("system/error", &slash.listener());
    // Under a `/` bus this is one literal segment, not a hierarchy.
    bus.on_shared("system.error", &dot.listener());

    bus.emit(Event::new("system/error", 0), false).unwrap();
    assert_eq!(slash.count(), 1);
    assert_eq!(dot.count(), 0);

    bus.emit(Event::new("system/*", 0), false).unwrap();
    assert_eq!(slash.count(), 1);
}

#[test]
fn empty_topic_is_a_valid_single_segment() {
    let bus: TopicBus<u32> = TopicBus::new();
    let counter = CountingListener::new();
    bus.on_shared("", &counter.listener());

    bus.emit(Event::new("", 9), false).unwrap();
    assert_eq!(counter.count(), 1);
}

//! Wait-bridge behavior: resolve on match, fail on timeout.

use std::time::Duration;

use topicbus::testing::CountingListener;
use topicbus::{BusError, Event, TopicBus};

#[tokio::test(start_paused = true)]
async fn wait_resolves_when_a_matching_event_arrives() {
    let bus: TopicBus<String> = TopicBus::new();

    let (waited, emitted) = tokio::join!(
        bus.wait_for("job.done", Some(Duration::from_secs(1))),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            bus.emit(Event::new("job.done", "ok".to_owned()), false)
        }
    );

    emitted.unwrap();
    let event = waited.unwrap();
    assert_eq!(event.topic, "job.done");
    assert_eq!(event.payload, "ok");
    // The bridging listener was fire-once and is gone.
    assert_eq!(bus.listener_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn wait_can_use_wildcard_patterns() {
    let bus: TopicBus<u32> = TopicBus::new();

    let (waited, _) = tokio::join!(bus.wait_for("job.**", Some(Duration::from_secs(1))), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        bus.emit(Event::new("job.build.done", 3), false)
    });

    assert_eq!(waited.unwrap().topic, "job.build.done");
}

#[tokio::test(start_paused = true)]
async fn wait_times_out_and_leaves_no_dangling_listener() {
    let bus: TopicBus<String> = TopicBus::new();

    let err = bus
        .wait_for("never", Some(Duration::from_millis(50)))
        .await
        .unwrap_err();
    match err {
        BusError::Timeout { pattern, timeout } => {
            assert_eq!(pattern, "never");
            assert_eq!(timeout, Duration::from_millis(50));
        }
        other => panic!("expected timeout, got {other:?}"),
    }

    assert_eq!(bus.listener_count(), 0);
    // A late emission triggers nothing extra.
    bus.emit(Event::new("never", "late".to_owned()), false)
        .unwrap();
}

#[tokio::test]
async fn wait_without_a_bound_suspends_until_the_event() {
    let bus: TopicBus<u32> = TopicBus::new();

    let (waited, _) = tokio::join!(bus.wait_for("ev", None), async {
        tokio::task::yield_now().await;
        bus.emit(Event::new("ev", 42), false)
    });

    assert_eq!(waited.unwrap().payload, 42);
}

#[tokio::test(start_paused = true)]
async fn timed_out_wait_does_not_eat_other_listeners() {
    let bus: TopicBus<u32> = TopicBus::new();
    let counter = CountingListener::new();
    bus.on_shared("ev", &counter.listener());

    let _ = bus.wait_for("ev", Some(Duration::from_millis(10))).await;
    bus.emit(Event::new("ev", 0), false).unwrap();
    assert_eq!(counter.count(), 1);
    assert_eq!(bus.listener_count(), 1);
}

/*!
 * Event Lifecycle Tests
 */

use client_telemetry::{
    AttributeId, ClientEventMetric, Counter, Event, EventError, EventType, ManualClock, MetricId,
    MetricValue, Timestamp,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use time::macros::datetime;

fn count_metric(value: i32) -> ClientEventMetric {
    ClientEventMetric {
        metric_id: MetricId::BytesDownloaded,
        value: MetricValue::Count(value),
    }
}

#[test]
fn test_event_creation() {
    let event = Event::new(EventType::Init);

    assert_eq!(event.event_type(), EventType::Init);
    assert!(!event.is_closed());
    assert_eq!(event.get_attribute(AttributeId::RemoteUrlScheme), None);
}

#[test]
fn test_event_ids_unique() {
    let a = Event::new(EventType::Init);
    let b = Event::new(EventType::Init);
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_attribute_overwrite() {
    let event = Event::new(EventType::Remote);
    event.set_attribute(AttributeId::RemoteUrlScheme, "v1").unwrap();
    event.set_attribute(AttributeId::RemoteUrlScheme, "v2").unwrap();

    let closed = event.close();
    let values: Vec<_> = closed
        .attributes
        .iter()
        .filter(|attr| attr.id == AttributeId::RemoteUrlScheme)
        .map(|attr| attr.value.as_str())
        .collect();
    assert_eq!(values, vec!["v2"]);
}

#[test]
fn test_second_close_fails() {
    let event = Event::new(EventType::Merge);
    let closed = event.close();
    assert_eq!(closed.id, event.id());

    match event.try_close() {
        Err(EventError::AlreadyClosed(id)) => assert_eq!(id, event.id()),
        other => panic!("expected illegal state, got {:?}", other),
    }
    assert!(event.is_closed());
}

#[test]
#[should_panic(expected = "already closed")]
fn test_second_close_halts() {
    let event = Event::new(EventType::Merge);
    let _first = event.close();
    let _second = event.close();
}

#[test]
fn test_closed_form_contents() {
    let clock = Arc::new(ManualClock::new(datetime!(2024-02-29 23:59:59 UTC)));
    let event = Event::with_clock(EventType::Clone, clock.clone());

    let mut counter = Counter::new(MetricId::BytesDownloaded);
    counter.add(4096);
    event.add_metric(&counter).unwrap();
    event
        .set_attribute(AttributeId::RemoteUrlScheme, "https")
        .unwrap();
    event
        .set_attribute(AttributeId::RemoteUrlHost, "example.com")
        .unwrap();

    clock.advance(Duration::from_millis(1500));
    let closed = event.close();

    assert_eq!(closed.event_type, EventType::Clone);
    assert_eq!(
        closed.start_time,
        Timestamp::from(datetime!(2024-02-29 23:59:59 UTC))
    );
    assert_eq!(
        closed.end_time,
        Timestamp::from(datetime!(2024-03-01 0:00:00.5 UTC))
    );
    assert_eq!(closed.metrics, vec![count_metric(4096)]);
    assert_eq!(closed.attributes.len(), 2);
    assert_eq!(closed.attribute(AttributeId::RemoteUrlScheme), Some("https"));
    assert_eq!(closed.attribute(AttributeId::RemoteUrlHost), Some("example.com"));
}

#[test]
fn test_unset_attribute_is_none() {
    let event = Event::new(EventType::Status);
    event.set_attribute(AttributeId::OutputFormat, "json").unwrap();
    assert_eq!(event.get_attribute(AttributeId::ServerMode), None);
}

#[test]
fn test_concurrent_mutation_no_loss() {
    const THREADS: i32 = 8;
    const PER_THREAD: i32 = 200;

    let event = Arc::new(Event::new(EventType::SqlServer));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let event = Arc::clone(&event);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    event.add_metric(&count_metric(t * PER_THREAD + i)).unwrap();
                    event
                        .set_attribute(AttributeId::OutputFormat, format!("thread-{}", t))
                        .unwrap();
                    let _ = event.get_attribute(AttributeId::OutputFormat);
                    assert_eq!(event.event_type(), EventType::SqlServer);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let closed = event.close();
    let mut values: Vec<i32> = closed
        .metrics
        .iter()
        .map(|m| match m.value {
            MetricValue::Count(v) => v,
            MetricValue::Duration(_) => panic!("unexpected duration metric"),
        })
        .collect();
    values.sort_unstable();
    let expected: Vec<i32> = (0..THREADS * PER_THREAD).collect();
    assert_eq!(values, expected);

    let value = closed.attribute(AttributeId::OutputFormat).unwrap();
    assert!(value.starts_with("thread-"));
    assert_eq!(closed.attributes.len(), 1);
}

#[test]
fn test_concurrent_close_exactly_once() {
    let event = Arc::new(Event::new(EventType::Push));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let event = Arc::clone(&event);
            thread::spawn(move || event.try_close().is_ok())
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
}

fn attribute_strategy() -> impl Strategy<Value = AttributeId> {
    prop_oneof![
        Just(AttributeId::RemoteUrlScheme),
        Just(AttributeId::RemoteUrlHost),
        Just(AttributeId::OutputFormat),
        Just(AttributeId::ServerMode),
    ]
}

proptest! {
    #[test]
    fn prop_closed_form_matches_mutations(
        metrics in prop::collection::vec(any::<i32>(), 0..64),
        attributes in prop::collection::vec((attribute_strategy(), "[a-z]{0,8}"), 0..32),
    ) {
        let event = Event::new(EventType::Log);
        let mut last = HashMap::new();

        for value in &metrics {
            event.add_metric(&count_metric(*value)).unwrap();
        }
        for (id, value) in &attributes {
            event.set_attribute(*id, value.clone()).unwrap();
            last.insert(*id, value.clone());
        }

        let closed = event.close();

        let recorded: Vec<_> = closed.metrics.iter().map(|m| m.value).collect();
        let expected: Vec<_> = metrics.iter().map(|v| MetricValue::Count(*v)).collect();
        prop_assert_eq!(recorded, expected);

        let recorded: HashMap<_, _> = closed
            .attributes
            .iter()
            .map(|attr| (attr.id, attr.value.clone()))
            .collect();
        prop_assert_eq!(closed.attributes.len(), recorded.len());
        prop_assert_eq!(recorded, last);
        prop_assert!(closed.end_time >= closed.start_time);
    }
}

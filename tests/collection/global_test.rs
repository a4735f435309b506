/*!
 * Default Collector Tests
 *
 * The default collector lives for the whole test process, so everything
 * touching it runs in one serialized test.
 */

use client_telemetry::{
    close_event_and_add, global_collector, shutdown_global, CollectorError, Event, EventType,
};
use serial_test::serial;

#[test]
#[serial]
fn test_global_collector_lifecycle() {
    let first = global_collector().expect("default collector should start");
    let second = global_collector().unwrap();
    assert!(std::ptr::eq(first, second));

    let events: Vec<_> = [EventType::Clone, EventType::Push]
        .into_iter()
        .map(Event::new)
        .collect();
    for event in &events {
        close_event_and_add(event).unwrap();
    }

    let batch = shutdown_global().unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].id, events[0].id());
    assert_eq!(batch[1].id, events[1].id());

    assert_eq!(first.try_shutdown(), Err(CollectorError::AlreadyShutDown));
    let late = Event::new(EventType::Pull);
    assert_eq!(
        first.try_close_event_and_add(&late),
        Err(CollectorError::ShutDown)
    );
    assert!(!late.is_closed());
    assert_eq!(first.events().map(|b| b.len()), Some(2));

    let second_shutdown = std::panic::catch_unwind(shutdown_global);
    assert!(second_shutdown.is_err());
}

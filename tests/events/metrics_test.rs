/*!
 * Event Metrics Tests
 */

use client_telemetry::{
    Counter, Event, EventMetric, EventType, ManualClock, MetricId, MetricValue, Timer,
};
use std::sync::Arc;
use std::time::Duration;
use time::macros::datetime;

#[test]
fn test_timer_and_counter_on_event() {
    let clock = Arc::new(ManualClock::new(datetime!(2024-07-01 9:00 UTC)));
    let event = Event::with_clock(EventType::Pull, clock.clone());

    let mut timer = Timer::start_with_clock(MetricId::DownloadMsElapsed, clock.clone());
    clock.advance(Duration::from_millis(42));
    timer.stop();

    let mut errors = Counter::new(MetricId::RemoteApiRpcError);
    errors.inc();
    errors.inc();

    event.add_metric(&timer).unwrap();
    event.add_metric(&errors).unwrap();

    let closed = event.close();
    assert_eq!(closed.metrics.len(), 2);
    assert_eq!(closed.metrics[0].metric_id, MetricId::DownloadMsElapsed);
    assert_eq!(
        closed.metrics[0].value,
        MetricValue::Duration(Duration::from_millis(42))
    );
    assert_eq!(closed.metrics[1].metric_id, MetricId::RemoteApiRpcError);
    assert_eq!(closed.metrics[1].value, MetricValue::Count(2));
}

#[test]
fn test_metric_snapshot_taken_at_add() {
    let event = Event::new(EventType::Fetch);
    let mut counter = Counter::new(MetricId::BytesDownloaded);
    counter.add(10);
    event.add_metric(&counter).unwrap();
    counter.add(90);

    let closed = event.close();
    assert_eq!(closed.metrics[0].value, MetricValue::Count(10));
    assert_eq!(counter.as_client_event_metric().value, MetricValue::Count(100));
}

#[test]
fn test_running_timer_reports_elapsed() {
    let clock = Arc::new(ManualClock::new(datetime!(2024-07-01 9:00 UTC)));
    let timer = Timer::start_with_clock(MetricId::DownloadMsElapsed, clock.clone());
    clock.advance(Duration::from_secs(2));

    assert!(timer.is_running());
    assert_eq!(
        timer.as_client_event_metric().value,
        MetricValue::Duration(Duration::from_secs(2))
    );
}

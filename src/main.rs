/*!
 * Telemetry Demo - Main Entry Point
 *
 * Records a burst of concurrent events through one collector, shuts it down
 * and writes the resulting batch to stdout as JSON.
 */

use anyhow::Context;
use client_telemetry::identity::machine_id_with;
use client_telemetry::monitoring::span_event;
use client_telemetry::{
    init_tracing, AttributeId, Collector, CollectorResult, Counter, Emitter, Event, EventBatch,
    EventType, HostMachineId, MetricId, TelemetryConfig, Timer, WriterEmitter,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Instrument};

const PRODUCERS: usize = 8;

const EVENT_TYPES: [EventType; 4] = [
    EventType::Clone,
    EventType::Fetch,
    EventType::Push,
    EventType::Pull,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = TelemetryConfig::from_env();
    config.validate().context("invalid telemetry configuration")?;
    info!(capacity = config.queue_capacity, app_id = %config.app_id, "telemetry demo starting");

    let collector = Arc::new(Collector::new(&config).context("failed to start collector")?);

    let mut tasks = Vec::with_capacity(PRODUCERS);
    for i in 0..PRODUCERS {
        let collector = Arc::clone(&collector);
        let event = Event::new(EVENT_TYPES[i % EVENT_TYPES.len()]);
        let span = span_event(&event);

        tasks.push(tokio::spawn(record_transfer(collector, event, i).instrument(span)));
    }

    for task in tasks {
        task.await.context("producer task failed")??;
    }

    let shutdown_collector = Arc::clone(&collector);
    let events = tokio::task::spawn_blocking(move || shutdown_collector.try_shutdown())
        .await
        .context("shutdown task failed")??;
    info!(events = events.len(), "collector drained");

    let machine_id = machine_id_with(&HostMachineId::new(config.app_id.clone()));
    let batch = EventBatch::with_machine_id(machine_id, config.app_id.clone(), events);
    WriterEmitter::new(std::io::stdout())
        .emit(&batch)
        .context("failed to write batch")?;

    Ok(())
}

/// Simulate one remote transfer and submit its event
async fn record_transfer(collector: Arc<Collector>, event: Event, i: usize) -> CollectorResult<()> {
    let mut timer = Timer::start(MetricId::DownloadMsElapsed);
    tokio::time::sleep(Duration::from_millis(5 * (i as u64 + 1))).await;
    timer.stop();

    let mut bytes = Counter::new(MetricId::BytesDownloaded);
    bytes.add(1024 * (i as i32 + 1));

    event.set_attribute(AttributeId::RemoteUrlScheme, "https")?;
    event.add_metric(&timer)?;
    event.add_metric(&bytes)?;

    collector.try_close_event_and_add_async(&event).await
}

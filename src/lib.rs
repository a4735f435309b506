/*!
 * Client Telemetry Library
 * Process-local event recording and batch aggregation
 *
 * Application code opens an [`Event`], annotates it from any number of
 * threads, then hands it to a [`Collector`], which closes it and aggregates
 * the closed form into one batch published at shutdown.
 */

pub mod collection;
pub mod config;
pub mod core;
pub mod emitter;
pub mod events;
pub mod identity;
pub mod monitoring;

// Re-exports
pub use collection::{
    close_event_and_add, global_collector, shutdown_global, Collector, CollectorStats,
};
pub use config::TelemetryConfig;
pub use crate::core::errors::*;
pub use crate::core::{Clock, EventId, ManualClock, SystemClock, Timestamp};
pub use emitter::{Emitter, EventBatch, NullEmitter, WriterEmitter};
pub use events::{
    AttributeId, ClientEvent, ClientEventAttribute, ClientEventMetric, Counter, Event,
    EventMetric, EventType, MetricId, MetricValue, Timer,
};
pub use identity::{machine_id, HostMachineId, MachineIdProvider};
pub use monitoring::init_tracing;

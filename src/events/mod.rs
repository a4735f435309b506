/*!
 * Event System
 * Open events, their metrics, and the immutable closed form
 */

mod client_event;
mod event;
mod metrics;
mod types;

pub use client_event::{ClientEvent, ClientEventAttribute};
pub use event::Event;
pub use metrics::{ClientEventMetric, Counter, EventMetric, MetricValue, Timer};
pub use types::{AttributeId, EventType, MetricId};

/*!
 * Collection
 * Bounded hand-off and single-worker aggregation of closed events
 */

mod collector;
mod global;
mod queue;

pub use collector::{Collector, CollectorStats};
pub use global::{close_event_and_add, global_collector, shutdown_global};
pub use queue::{Consumer, EventQueue, Producer};

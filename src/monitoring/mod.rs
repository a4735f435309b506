/*!
 * Monitoring
 * Structured logging for the telemetry pipeline itself
 */

mod tracer;

pub use tracer::{init_tracing, span_event};

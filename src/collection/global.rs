/*!
 * Default Collector
 * Process-wide collector used when no instance is passed explicitly
 *
 * Created lazily on first use, never torn down or re-created. Code that can
 * take a `&Collector` should; this is the fallback at the outer boundary.
 */

use super::collector::Collector;
use crate::config::TelemetryConfig;
use crate::core::errors::{CollectorError, CollectorResult};
use crate::events::{ClientEvent, Event};
use std::sync::{Arc, OnceLock};
use tracing::error;

static GLOBAL_COLLECTOR: OnceLock<Option<Collector>> = OnceLock::new();

/// Default collector, started on first call from `TelemetryConfig::from_env()`.
/// `None` if it could not be started.
pub fn global_collector() -> Option<&'static Collector> {
    GLOBAL_COLLECTOR
        .get_or_init(|| match Collector::new(&TelemetryConfig::from_env()) {
            Ok(collector) => Some(collector),
            Err(e) => {
                error!(error = %e, "default event collector unavailable");
                None
            }
        })
        .as_ref()
}

/// Close `event` and queue it on the default collector.
///
/// Fails only when the default collector is unavailable; contract
/// violations panic as in [`Collector::close_event_and_add`].
#[track_caller]
pub fn close_event_and_add(event: &Event) -> CollectorResult<()> {
    global_collector()
        .ok_or(CollectorError::Unavailable)?
        .close_event_and_add(event);
    Ok(())
}

/// Shut down the default collector and return its batch.
///
/// Fails only when the default collector is unavailable; a second shutdown
/// panics as in [`Collector::shutdown`].
#[track_caller]
pub fn shutdown_global() -> CollectorResult<Arc<[ClientEvent]>> {
    Ok(global_collector()
        .ok_or(CollectorError::Unavailable)?
        .shutdown())
}

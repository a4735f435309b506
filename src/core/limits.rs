/*!
 * Limits and Constants
 *
 * Central location for collector sizing and identity defaults.
 */

// =============================================================================
// COLLECTOR
// =============================================================================

/// Default bounded queue capacity between producers and the aggregation worker
/// [PERF] Small enough to throttle bursts, large enough to absorb normal fan-in
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Upper bound accepted from configuration
pub const MAX_QUEUE_CAPACITY: usize = 64 * 1024;

/// Name of the aggregation worker thread
pub const DEFAULT_WORKER_NAME: &str = "telemetry-collector";

// =============================================================================
// IDENTITY
// =============================================================================

/// Application id used to key the installation identifier
pub const DEFAULT_APP_ID: &str = "client-telemetry";

/// Sentinel used when the installation identifier cannot be computed
pub const INVALID_MACHINE_ID: &str = "invalid";

/// Machine id sources, checked in order
pub const MACHINE_ID_PATHS: &[&str] = &["/var/lib/dbus/machine-id", "/etc/machine-id"];

// =============================================================================
// ENVIRONMENT
// =============================================================================

pub const ENV_QUEUE_CAPACITY: &str = "TELEMETRY_QUEUE_CAPACITY";
pub const ENV_APP_ID: &str = "TELEMETRY_APP_ID";
pub const ENV_TRACE_JSON: &str = "TELEMETRY_TRACE_JSON";

/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use super::types::EventId;
use miette::Diagnostic;
use thiserror::Error;

/// Event lifecycle errors
///
/// Every variant is an illegal-state condition: the caller used an event
/// after it was closed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum EventError {
    #[error("Illegal state: event {0} was already closed")]
    #[diagnostic(
        code(event::already_closed),
        help("An event can be closed exactly once. Its closed form was already handed off.")
    )]
    AlreadyClosed(EventId),

    #[error("Illegal state: cannot {operation} on closed event {id}")]
    #[diagnostic(
        code(event::mutated_after_close),
        help("Add metrics and attributes before submitting the event to a collector.")
    )]
    MutatedAfterClose {
        id: EventId,
        operation: &'static str,
    },
}

impl EventError {
    /// Whether this error signals misuse of a closed event
    #[inline]
    pub fn is_illegal_state(&self) -> bool {
        matches!(
            self,
            EventError::AlreadyClosed(_) | EventError::MutatedAfterClose { .. }
        )
    }
}

/// Bounded queue errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum QueueError {
    #[error("Queue closed")]
    #[diagnostic(
        code(queue::closed),
        help("The queue no longer accepts items once it has been closed.")
    )]
    Closed,

    #[error("Queue full: capacity {0}")]
    #[diagnostic(
        code(queue::full),
        help("Use a blocking send to wait for the consumer to make room.")
    )]
    Full(usize),

    #[error("Queue disconnected: consumer is gone")]
    #[diagnostic(
        code(queue::disconnected),
        help("The consuming side was dropped before the item could be delivered.")
    )]
    Disconnected,
}

/// Collector errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum CollectorError {
    #[error("Collector is shut down; no further events are accepted")]
    #[diagnostic(
        code(collector::shut_down),
        help("Submit every event before calling shutdown.")
    )]
    ShutDown,

    #[error("Collector shutdown was already requested")]
    #[diagnostic(
        code(collector::already_shut_down),
        help("Call shutdown once and read the published batch with `events()` afterwards.")
    )]
    AlreadyShutDown,

    #[error("Invalid queue capacity: {0}")]
    #[diagnostic(
        code(collector::invalid_capacity),
        help("The queue capacity must be at least 1.")
    )]
    InvalidCapacity(usize),

    #[error("Failed to spawn aggregation worker: {0}")]
    #[diagnostic(
        code(collector::worker_spawn),
        help("The system may be out of threads. Check process limits.")
    )]
    WorkerSpawn(String),

    #[error("Aggregation worker terminated abnormally")]
    #[diagnostic(
        code(collector::worker_panicked),
        help("The background worker panicked. Check logs for the panic message.")
    )]
    WorkerPanicked,

    #[error("Event hand-off task was aborted before delivery")]
    #[diagnostic(
        code(collector::handoff_aborted),
        help("The async runtime shut down while the queue was full.")
    )]
    HandoffAborted,

    #[error("Default collector is unavailable")]
    #[diagnostic(
        code(collector::unavailable),
        help("The process-wide collector failed to start. Check logs for the cause.")
    )]
    Unavailable,

    #[error("Event error: {0}")]
    #[diagnostic(transparent)]
    Event(#[from] EventError),

    #[error("Queue error: {0}")]
    #[diagnostic(transparent)]
    Queue(#[from] QueueError),
}

/// Installation identifier errors
#[derive(Error, Debug, Diagnostic)]
pub enum IdentityError {
    #[error("No machine id source found")]
    #[diagnostic(
        code(identity::not_found),
        help("None of the known machine id files exist on this host.")
    )]
    NotFound,

    #[error("Machine id source is empty: {0}")]
    #[diagnostic(code(identity::empty))]
    Empty(String),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(identity::io_error),
        help("The machine id file could not be read. Check file permissions.")
    )]
    Io(#[from] std::io::Error),
}

/// Downstream sink errors
#[derive(Error, Debug, Diagnostic)]
pub enum EmitError {
    #[error("Serialization failed: {0}")]
    #[diagnostic(code(emitter::serialization))]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(emitter::io_error),
        help("Writing the batch failed. Check the destination.")
    )]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Check the environment variable and its expected format.")
    )]
    InvalidValue { key: &'static str, value: String },

    #[error("Queue capacity must be at least 1")]
    #[diagnostic(code(config::zero_capacity))]
    ZeroCapacity,

    #[error("Application id must not be empty")]
    #[diagnostic(code(config::empty_app_id))]
    EmptyAppId,
}

pub type EventResult<T> = Result<T, EventError>;
pub type QueueResult<T> = Result<T, QueueError>;
pub type CollectorResult<T> = Result<T, CollectorError>;
pub type IdentityResult<T> = Result<T, IdentityError>;
pub type EmitResult<T> = Result<T, EmitError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

/*!
 * Event Lifecycle
 * Thread-safe open -> closed record of one client operation
 *
 * Every operation takes the per-event lock, so concurrent callers observe a
 * total order. Closing swaps the live state for `Closed`; afterwards nothing
 * can reach the metrics or attributes again.
 */

use super::client_event::{ClientEvent, ClientEventAttribute};
use super::metrics::{ClientEventMetric, EventMetric};
use super::types::{AttributeId, EventType};
use crate::core::clock::{system_clock, Clock};
use crate::core::errors::{EventError, EventResult};
use crate::core::types::{EventId, Timestamp};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Live state of an event
#[derive(Debug)]
enum EventState {
    Open(OpenEvent),
    Closed { closed_at: Timestamp },
}

/// Mutable fields, only reachable while open
#[derive(Debug)]
struct OpenEvent {
    start_time: Timestamp,
    metrics: Vec<ClientEventMetric>,
    attributes: HashMap<AttributeId, String>,
}

/// In-progress event; share it behind an `Arc` to annotate from several threads
#[derive(Debug)]
pub struct Event {
    id: EventId,
    event_type: EventType,
    clock: Arc<dyn Clock>,
    state: Mutex<EventState>,
}

impl Event {
    /// Create an open event stamped with the current system time
    pub fn new(event_type: EventType) -> Self {
        Self::with_clock(event_type, system_clock())
    }

    /// Create an open event using `clock` for start and end stamps
    pub fn with_clock(event_type: EventType, clock: Arc<dyn Clock>) -> Self {
        let start_time = Timestamp::from(clock.now());
        Self {
            id: EventId::new(),
            event_type,
            clock,
            state: Mutex::new(EventState::Open(OpenEvent {
                start_time,
                metrics: Vec::new(),
                attributes: HashMap::new(),
            })),
        }
    }

    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Fixed at creation
    #[inline]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn is_closed(&self) -> bool {
        matches!(*self.state.lock(), EventState::Closed { .. })
    }

    /// Append a metric
    pub fn add_metric<M: EventMetric + ?Sized>(&self, metric: &M) -> EventResult<()> {
        let mut state = self.state.lock();
        let open = self.open_mut(&mut state, "add metric")?;
        open.metrics.push(metric.as_client_event_metric());
        Ok(())
    }

    /// Set an attribute, replacing any previous value for `id`
    pub fn set_attribute(&self, id: AttributeId, value: impl Into<String>) -> EventResult<()> {
        let mut state = self.state.lock();
        let open = self.open_mut(&mut state, "set attribute")?;
        open.attributes.insert(id, value.into());
        Ok(())
    }

    /// Current value for `id`; `None` if unset or once the event is closed
    pub fn get_attribute(&self, id: AttributeId) -> Option<String> {
        match &*self.state.lock() {
            EventState::Open(open) => open.attributes.get(&id).cloned(),
            EventState::Closed { .. } => None,
        }
    }

    /// Freeze the event into its closed form.
    ///
    /// # Panics
    ///
    /// If the event was already closed. A second close means the closed form
    /// was already handed off; use [`try_close`](Self::try_close) to get the
    /// error instead.
    #[track_caller]
    pub fn close(&self) -> ClientEvent {
        match self.try_close() {
            Ok(closed) => closed,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible [`close`](Self::close).
    ///
    /// Succeeds exactly once; every later call fails with
    /// [`EventError::AlreadyClosed`] and produces nothing.
    pub fn try_close(&self) -> EventResult<ClientEvent> {
        let mut state = self.state.lock();
        if let EventState::Closed { closed_at } = &*state {
            warn!(event_id = %self.id, closed_at = %closed_at, "duplicate close rejected");
            return Err(EventError::AlreadyClosed(self.id));
        }

        let end_time = Timestamp::from(self.clock.now());
        let open = match std::mem::replace(&mut *state, EventState::Closed { closed_at: end_time }) {
            EventState::Open(open) => open,
            EventState::Closed { .. } => return Err(EventError::AlreadyClosed(self.id)),
        };
        drop(state);

        let attributes = open
            .attributes
            .into_iter()
            .map(|(id, value)| ClientEventAttribute { id, value })
            .collect();

        debug!(
            event_id = %self.id,
            event_type = %self.event_type,
            metrics = open.metrics.len(),
            "event closed"
        );

        Ok(ClientEvent {
            id: self.id,
            event_type: self.event_type,
            start_time: open.start_time,
            end_time,
            metrics: open.metrics,
            attributes,
        })
    }

    fn open_mut<'a>(
        &self,
        state: &'a mut EventState,
        operation: &'static str,
    ) -> EventResult<&'a mut OpenEvent> {
        match state {
            EventState::Open(open) => Ok(open),
            EventState::Closed { .. } => {
                warn!(event_id = %self.id, operation, "mutation of closed event rejected");
                Err(EventError::MutatedAfterClose {
                    id: self.id,
                    operation,
                })
            }
        }
    }
}

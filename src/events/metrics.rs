/*!
 * Event Metrics
 * Timers and counters recorded on an event
 */

use super::types::MetricId;
use crate::core::clock::{system_clock, Clock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

/// Metric payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    Duration(Duration),
    Count(i32),
}

/// Wire form of a metric as stored on a closed event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEventMetric {
    pub metric_id: MetricId,
    pub value: MetricValue,
}

/// Anything that can be attached to an event as a metric
pub trait EventMetric {
    fn as_client_event_metric(&self) -> ClientEventMetric;
}

impl EventMetric for ClientEventMetric {
    #[inline]
    fn as_client_event_metric(&self) -> ClientEventMetric {
        *self
    }
}

/// Measures elapsed time between start and stop
#[derive(Debug, Clone)]
pub struct Timer {
    metric_id: MetricId,
    clock: Arc<dyn Clock>,
    start: OffsetDateTime,
    stop: Option<OffsetDateTime>,
}

impl Timer {
    /// Start a timer on the system clock
    pub fn start(metric_id: MetricId) -> Self {
        Self::start_with_clock(metric_id, system_clock())
    }

    pub fn start_with_clock(metric_id: MetricId, clock: Arc<dyn Clock>) -> Self {
        let start = clock.now();
        Self {
            metric_id,
            clock,
            start,
            stop: None,
        }
    }

    /// Freeze the measured duration; later calls keep the first stop time
    pub fn stop(&mut self) -> Duration {
        if self.stop.is_none() {
            self.stop = Some(self.clock.now());
        }
        self.elapsed()
    }

    /// Elapsed time until stop, or until now for a running timer.
    /// A clock that went backwards yields zero.
    pub fn elapsed(&self) -> Duration {
        let end = self.stop.unwrap_or_else(|| self.clock.now());
        (end - self.start).try_into().unwrap_or(Duration::ZERO)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.stop.is_none()
    }
}

impl EventMetric for Timer {
    fn as_client_event_metric(&self) -> ClientEventMetric {
        ClientEventMetric {
            metric_id: self.metric_id,
            value: MetricValue::Duration(self.elapsed()),
        }
    }
}

/// Signed event counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    metric_id: MetricId,
    value: i32,
}

impl Counter {
    pub fn new(metric_id: MetricId) -> Self {
        Self {
            metric_id,
            value: 0,
        }
    }

    #[inline]
    pub fn inc(&mut self) {
        self.add(1);
    }

    #[inline]
    pub fn dec(&mut self) {
        self.add(-1);
    }

    #[inline]
    pub fn add(&mut self, delta: i32) {
        self.value = self.value.saturating_add(delta);
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl EventMetric for Counter {
    fn as_client_event_metric(&self) -> ClientEventMetric {
        ClientEventMetric {
            metric_id: self.metric_id,
            value: MetricValue::Count(self.value),
        }
    }
}

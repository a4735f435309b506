/*!
 * Closed Form
 * Immutable snapshot produced when an event is closed
 */

use super::metrics::ClientEventMetric;
use super::types::{AttributeId, EventType};
use crate::core::types::{EventId, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Single attribute value on a closed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEventAttribute {
    pub id: AttributeId,
    pub value: String,
}

/// Closed event as handed to the collector and the downstream sink
///
/// Attribute order is unspecified; look attributes up by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<ClientEventMetric>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ClientEventAttribute>,
}

impl ClientEvent {
    /// Value recorded for `id`, if any
    pub fn attribute(&self, id: AttributeId) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.id == id)
            .map(|attr| attr.value.as_str())
    }

    /// Wall-clock time between start and end (zero if the clock went backwards)
    pub fn duration(&self) -> Duration {
        match (
            self.start_time.to_offset_date_time(),
            self.end_time.to_offset_date_time(),
        ) {
            (Some(start), Some(end)) => (end - start).try_into().unwrap_or(Duration::ZERO),
            _ => Duration::ZERO,
        }
    }
}

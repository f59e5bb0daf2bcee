//! Publication envelope for domain events.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::DomainEvent;

/// Unique identifier for a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A domain event wrapped with the metadata an event bus needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique identifier for this publication.
    pub event_id: EventId,

    /// The type of the event (e.g., "AccommodationCreated").
    pub event_type: String,

    /// The aggregate that recorded the event.
    pub aggregate_id: Uuid,

    /// The type of aggregate (e.g., "accommodation", "room type").
    pub aggregate_type: String,

    /// When the fact happened.
    pub occurred_at: DateTime<Utc>,

    /// The event payload as JSON.
    pub payload: serde_json::Value,

    /// Additional metadata about the event.
    pub metadata: HashMap<String, serde_json::Value>,
}

impl EventEnvelope {
    /// Wraps a domain event recorded by an aggregate of the given type.
    pub fn wrap<E: DomainEvent>(
        aggregate_type: impl Into<String>,
        event: &E,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: EventId::new(),
            event_type: event.event_type().to_string(),
            aggregate_id: event.aggregate_id(),
            aggregate_type: aggregate_type.into(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
            metadata: HashMap::new(),
        })
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

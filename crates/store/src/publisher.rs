//! In-memory event publisher.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use domain::EventEnvelope;
use domain::ports::{EventPublisher, PortError};

#[derive(Debug, Default)]
struct PublisherState {
    published: Vec<EventEnvelope>,
    fail_on_publish: bool,
}

/// Collects published events in memory, for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    state: Arc<RwLock<PublisherState>>,
}

impl InMemoryEventPublisher {
    /// Creates a new publisher with nothing published.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the publisher to fail every publish call.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fail_on_publish = fail;
    }

    /// Returns every event published so far, in publication order.
    pub fn published(&self) -> Vec<EventEnvelope> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .published
            .clone()
    }

    /// Returns the event types published so far, in publication order.
    pub fn published_types(&self) -> Vec<String> {
        self.published()
            .into_iter()
            .map(|envelope| envelope.event_type)
            .collect()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, events: Vec<EventEnvelope>) -> Result<(), PortError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.fail_on_publish {
            return Err(PortError::unavailable("event_publisher", "broker offline"));
        }
        state.published.extend(events);
        Ok(())
    }
}

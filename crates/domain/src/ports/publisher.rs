use async_trait::async_trait;

use crate::event::EventEnvelope;

use super::PortError;

/// Ships drained domain events to downstream consumers.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes events in the order given.
    ///
    /// Called once per orchestration cycle after the aggregate was persisted.
    async fn publish(&self, events: Vec<EventEnvelope>) -> Result<(), PortError>;
}

//! Draining recorded events and handing them to the publisher.

use domain::ports::EventPublisher;
use domain::{AggregateRoot, EventEnvelope};

use crate::error::ServiceResult;

/// Drains the aggregate's events and wraps them for publication.
///
/// Call once per cycle, after the aggregate was saved.
pub(crate) fn drain<T: AggregateRoot>(aggregate: &mut T) -> ServiceResult<Vec<EventEnvelope>> {
    let envelopes = aggregate
        .pull_domain_events()
        .iter()
        .map(|event| EventEnvelope::wrap(T::entity_type(), event))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(envelopes)
}

/// Publishes envelopes in recording order. Nothing is retried.
pub(crate) async fn publish<P: EventPublisher + ?Sized>(
    publisher: &P,
    envelopes: Vec<EventEnvelope>,
) -> ServiceResult<()> {
    if envelopes.is_empty() {
        return Ok(());
    }
    let count = envelopes.len();
    let aggregate_type = envelopes[0].aggregate_type.clone();
    if let Err(err) = publisher.publish(envelopes).await {
        tracing::warn!(%aggregate_type, count, error = %err, "Publishing events failed after save");
        return Err(err.into());
    }
    metrics::counter!("events_published_total", "aggregate" => aggregate_type.clone())
        .increment(count as u64);
    tracing::debug!(%aggregate_type, count, "Published events");
    Ok(())
}

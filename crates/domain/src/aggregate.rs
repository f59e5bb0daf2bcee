//! Core entity, aggregate and domain event traits.

use chrono::{DateTime, Utc};
use common::Version;
use serde::Serialize;
use uuid::Uuid;

use crate::error::DomainResult;

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: Serialize + Send + Sync + Clone + std::fmt::Debug {
    /// Returns the event type name used when publishing.
    fn event_type(&self) -> &'static str;

    /// Returns the identity of the aggregate that recorded the event.
    fn aggregate_id(&self) -> Uuid;

    /// Returns when the fact happened.
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// An object with identity and a persistence version.
pub trait Entity {
    /// Strongly-typed identifier.
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Debug + std::fmt::Display;

    /// Returns the entity type name, used in errors and envelopes.
    fn entity_type() -> &'static str;

    /// Returns the entity's identifier.
    fn id(&self) -> Self::Id;

    /// Returns the version the entity was loaded at (0 if never persisted).
    fn version(&self) -> Version;

    /// Sets the version.
    ///
    /// Called by repositories after a successful save.
    fn set_version(&mut self, version: Version);

    /// Re-checks rules that span several fields.
    ///
    /// Repositories call this after rehydrating a stored row.
    fn check_invariants(&self) -> DomainResult<()> {
        Ok(())
    }
}

/// Root of a consistency boundary.
///
/// An aggregate records the events produced by its own methods and hands them
/// to the orchestrator exactly once through [`AggregateRoot::pull_domain_events`].
pub trait AggregateRoot: Entity {
    /// The events this aggregate records.
    type Event: DomainEvent;

    /// Returns the recorded events and clears the buffer.
    fn pull_domain_events(&mut self) -> Vec<Self::Event>;

    /// Returns the recorded events without draining them.
    fn pending_events(&self) -> &[Self::Event];
}

/// Append-only buffer of events recorded by one aggregate instance.
///
/// Embedded in each aggregate struct in place of a shared base class.
#[derive(Debug, Clone)]
pub struct EventRecorder<E> {
    pending: Vec<E>,
}

impl<E> Default for EventRecorder<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<E> EventRecorder<E> {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&mut self, event: E) {
        self.pending.push(event);
    }

    /// Returns all recorded events in recording order, leaving the buffer empty.
    pub fn pull(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }

    /// Returns the recorded events without draining them.
    pub fn pending(&self) -> &[E] {
        &self.pending
    }

    /// Returns true if nothing has been recorded since the last drain.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_drains_in_recording_order() {
        let mut recorder = EventRecorder::new();
        recorder.record("created");
        recorder.record("approved");

        assert_eq!(recorder.pending(), &["created", "approved"]);
        assert_eq!(recorder.pull(), vec!["created", "approved"]);
        assert!(recorder.is_empty());
    }

    #[test]
    fn second_pull_returns_nothing() {
        let mut recorder = EventRecorder::new();
        recorder.record(1);

        assert_eq!(recorder.pull().len(), 1);
        assert!(recorder.pull().is_empty());
    }
}

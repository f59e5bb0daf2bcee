//! Accommodation domain events.

use chrono::{DateTime, Utc};
use common::{AccommodationId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::DomainEvent;

use super::AccommodationType;

/// Events recorded by the accommodation aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AccommodationEvent {
    /// Accommodation was registered and awaits review.
    AccommodationCreated(AccommodationCreatedData),

    /// A reviewer approved the accommodation.
    AccommodationApproved(AccommodationApprovedData),

    /// A reviewer rejected the accommodation.
    AccommodationRejected(AccommodationRejectedData),

    /// Accommodation opened for business.
    AccommodationActivated(AccommodationStatusChangedData),

    /// Accommodation was taken offline.
    AccommodationSuspended(AccommodationStatusChangedData),
}

impl DomainEvent for AccommodationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccommodationEvent::AccommodationCreated(_) => "AccommodationCreated",
            AccommodationEvent::AccommodationApproved(_) => "AccommodationApproved",
            AccommodationEvent::AccommodationRejected(_) => "AccommodationRejected",
            AccommodationEvent::AccommodationActivated(_) => "AccommodationActivated",
            AccommodationEvent::AccommodationSuspended(_) => "AccommodationSuspended",
        }
    }

    fn aggregate_id(&self) -> Uuid {
        let id = match self {
            AccommodationEvent::AccommodationCreated(data) => data.accommodation_id,
            AccommodationEvent::AccommodationApproved(data) => data.accommodation_id,
            AccommodationEvent::AccommodationRejected(data) => data.accommodation_id,
            AccommodationEvent::AccommodationActivated(data)
            | AccommodationEvent::AccommodationSuspended(data) => data.accommodation_id,
        };
        id.as_uuid()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccommodationEvent::AccommodationCreated(data) => data.occurred_at,
            AccommodationEvent::AccommodationApproved(data) => data.occurred_at,
            AccommodationEvent::AccommodationRejected(data) => data.occurred_at,
            AccommodationEvent::AccommodationActivated(data)
            | AccommodationEvent::AccommodationSuspended(data) => data.occurred_at,
        }
    }
}

/// Data for AccommodationCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationCreatedData {
    pub accommodation_id: AccommodationId,
    pub owner_id: UserId,
    #[serde(rename = "type")]
    pub accommodation_type: AccommodationType,
    pub occurred_at: DateTime<Utc>,
}

/// Data for AccommodationApproved event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationApprovedData {
    pub accommodation_id: AccommodationId,
    pub approved_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Data for AccommodationRejected event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationRejectedData {
    pub accommodation_id: AccommodationId,
    pub rejected_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Data for AccommodationActivated and AccommodationSuspended events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationStatusChangedData {
    pub accommodation_id: AccommodationId,
    pub occurred_at: DateTime<Utc>,
}

// Convenience constructors for events
impl AccommodationEvent {
    pub fn created(
        accommodation_id: AccommodationId,
        owner_id: UserId,
        accommodation_type: AccommodationType,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        AccommodationEvent::AccommodationCreated(AccommodationCreatedData {
            accommodation_id,
            owner_id,
            accommodation_type,
            occurred_at,
        })
    }

    pub fn approved(
        accommodation_id: AccommodationId,
        approved_by: UserId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        AccommodationEvent::AccommodationApproved(AccommodationApprovedData {
            accommodation_id,
            approved_by,
            occurred_at,
        })
    }

    pub fn rejected(
        accommodation_id: AccommodationId,
        rejected_by: UserId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        AccommodationEvent::AccommodationRejected(AccommodationRejectedData {
            accommodation_id,
            rejected_by,
            occurred_at,
        })
    }

    pub fn activated(accommodation_id: AccommodationId, occurred_at: DateTime<Utc>) -> Self {
        AccommodationEvent::AccommodationActivated(AccommodationStatusChangedData {
            accommodation_id,
            occurred_at,
        })
    }

    pub fn suspended(accommodation_id: AccommodationId, occurred_at: DateTime<Utc>) -> Self {
        AccommodationEvent::AccommodationSuspended(AccommodationStatusChangedData {
            accommodation_id,
            occurred_at,
        })
    }
}

use chrono::{DateTime, Utc};
use common::{AccommodationId, RoomId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::DomainEvent;

/// Events recorded by the homestay room aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RoomEvent {
    RoomCreated(RoomCreatedData),
    /// Number of sellable units changed.
    RoomInventoryAdjusted(RoomInventoryAdjustedData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCreatedData {
    pub room_id: RoomId,
    pub accommodation_id: AccommodationId,
    pub inventory: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInventoryAdjustedData {
    pub room_id: RoomId,
    pub previous: u32,
    pub current: u32,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for RoomEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::RoomCreated(_) => "RoomCreated",
            RoomEvent::RoomInventoryAdjusted(_) => "RoomInventoryAdjusted",
        }
    }

    fn aggregate_id(&self) -> Uuid {
        let id = match self {
            RoomEvent::RoomCreated(data) => data.room_id,
            RoomEvent::RoomInventoryAdjusted(data) => data.room_id,
        };
        id.as_uuid()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RoomEvent::RoomCreated(data) => data.occurred_at,
            RoomEvent::RoomInventoryAdjusted(data) => data.occurred_at,
        }
    }
}

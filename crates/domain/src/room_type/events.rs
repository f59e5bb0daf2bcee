use chrono::{DateTime, Utc};
use common::{AccommodationId, FloorId, HotelRoomId, RoomTypeId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::DomainEvent;

/// Events recorded by the hotel room type aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RoomTypeEvent {
    RoomTypeCreated(RoomTypeCreatedData),

    /// The declared cap changed.
    RoomTypeInventoryAdjusted(RoomTypeInventoryAdjustedData),

    /// A physical room was added under the cap.
    HotelRoomCreated(HotelRoomCreatedData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeCreatedData {
    pub room_type_id: RoomTypeId,
    pub hotel_id: AccommodationId,
    pub inventory: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeInventoryAdjustedData {
    pub room_type_id: RoomTypeId,
    pub previous: u32,
    pub current: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRoomCreatedData {
    pub room_type_id: RoomTypeId,
    pub hotel_room_id: HotelRoomId,
    pub room_number: String,
    pub floor_id: Option<FloorId>,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for RoomTypeEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RoomTypeEvent::RoomTypeCreated(_) => "RoomTypeCreated",
            RoomTypeEvent::RoomTypeInventoryAdjusted(_) => "RoomTypeInventoryAdjusted",
            RoomTypeEvent::HotelRoomCreated(_) => "HotelRoomCreated",
        }
    }

    fn aggregate_id(&self) -> Uuid {
        let id = match self {
            RoomTypeEvent::RoomTypeCreated(data) => data.room_type_id,
            RoomTypeEvent::RoomTypeInventoryAdjusted(data) => data.room_type_id,
            RoomTypeEvent::HotelRoomCreated(data) => data.room_type_id,
        };
        id.as_uuid()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RoomTypeEvent::RoomTypeCreated(data) => data.occurred_at,
            RoomTypeEvent::RoomTypeInventoryAdjusted(data) => data.occurred_at,
            RoomTypeEvent::HotelRoomCreated(data) => data.occurred_at,
        }
    }
}

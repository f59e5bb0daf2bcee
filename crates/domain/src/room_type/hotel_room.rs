//! Physical hotel rooms.

use chrono::{DateTime, Utc};
use common::{FloorId, HotelRoomId, RoomTypeId, Version};
use serde::{Deserialize, Serialize};

use crate::aggregate::Entity;
use crate::error::{DomainError, DomainResult};
use crate::value_objects::RoomNumber;

labelled_enum! {
    /// Housekeeping and occupancy status of a physical room.
    ///
    /// ```text
    /// Available ──► Occupied | Clean | Dirty | Maintenance   (any order)
    /// Occupied | Maintenance ──release──► Available
    /// ```
    pub enum HotelRoomStatus ("status") {
        Available => "AVAILABLE",
        Occupied => "OCCUPIED",
        Clean => "CLEAN",
        Dirty => "DIRTY",
        Maintenance => "MAINTENANCE",
    }
}

impl HotelRoomStatus {
    /// Returns true if [`HotelRoom::release`] is legal from this status.
    pub fn can_release(&self) -> bool {
        matches!(self, HotelRoomStatus::Occupied | HotelRoomStatus::Maintenance)
    }
}

/// Input for [`crate::RoomType::create_hotel_room`].
#[derive(Debug, Clone)]
pub struct NewHotelRoom {
    pub room_number: RoomNumber,
    pub floor_id: Option<FloorId>,
    pub notes: Option<String>,
}

impl NewHotelRoom {
    pub fn numbered(room_number: RoomNumber) -> Self {
        Self {
            room_number,
            floor_id: None,
            notes: None,
        }
    }
}

/// One physical room of a hotel room type.
///
/// Created only through its parent room type, which enforces the inventory cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRoom {
    id: HotelRoomId,
    #[serde(default)]
    version: Version,
    room_type_id: RoomTypeId,
    room_number: RoomNumber,
    floor_id: Option<FloorId>,
    status: HotelRoomStatus,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Entity for HotelRoom {
    type Id = HotelRoomId;

    fn entity_type() -> &'static str {
        "hotel_room"
    }

    fn id(&self) -> HotelRoomId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

impl HotelRoom {
    pub(crate) fn new(id: HotelRoomId, room_type_id: RoomTypeId, props: NewHotelRoom) -> Self {
        let now = Utc::now();
        Self {
            id,
            version: Version::initial(),
            room_type_id,
            room_number: props.room_number,
            floor_id: props.floor_id,
            status: HotelRoomStatus::Available,
            notes: normalize_notes(props.notes),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn room_type_id(&self) -> RoomTypeId {
        self.room_type_id
    }

    pub fn room_number(&self) -> &RoomNumber {
        &self.room_number
    }

    pub fn floor_id(&self) -> Option<FloorId> {
        self.floor_id
    }

    pub fn status(&self) -> HotelRoomStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn mark_occupied(&mut self) {
        self.set_status(HotelRoomStatus::Occupied);
    }

    pub fn mark_clean(&mut self) {
        self.set_status(HotelRoomStatus::Clean);
    }

    pub fn mark_dirty(&mut self) {
        self.set_status(HotelRoomStatus::Dirty);
    }

    pub fn mark_maintenance(&mut self) {
        self.set_status(HotelRoomStatus::Maintenance);
    }

    /// Returns an occupied or maintained room to AVAILABLE.
    pub fn release(&mut self) -> DomainResult<()> {
        if !self.status.can_release() {
            return Err(DomainError::invalid_state(
                Self::entity_type(),
                "release",
                self.status,
                "OCCUPIED or MAINTENANCE",
            ));
        }
        self.set_status(HotelRoomStatus::Available);
        Ok(())
    }

    /// Replaces the notes; blank text clears them.
    pub fn update_notes(&mut self, notes: Option<String>) {
        self.notes = normalize_notes(notes);
        self.touch();
    }

    pub fn assign_floor(&mut self, floor_id: Option<FloorId>) {
        self.floor_id = floor_id;
        self.touch();
    }

    fn set_status(&mut self, status: HotelRoomStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}

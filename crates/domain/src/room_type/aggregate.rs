//! Hotel room type aggregate.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::{AccommodationId, HotelRoomId, IdGenerator, RoomTypeId, Version};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, Entity, EventRecorder};
use crate::error::{DomainError, DomainResult};
use crate::room::{RoomProfile, RoomStatus};
use crate::value_objects::{Amenities, Money, RoomImage, RoomInventory, ViewDirection};

use super::events::{
    HotelRoomCreatedData, RoomTypeCreatedData, RoomTypeEvent, RoomTypeInventoryAdjustedData,
};
use super::{HotelRoom, NewHotelRoom};

const ENTITY: &str = "room_type";

/// Fewest images a room type may show.
pub const MIN_ROOM_TYPE_IMAGES: usize = 3;

#[derive(Debug, Clone)]
pub struct NewRoomType {
    pub hotel_id: AccommodationId,
    pub profile: RoomProfile,
    pub description: String,
    pub amenities: Amenities,
    pub images: Vec<RoomImage>,
    pub inventory: RoomInventory,
    pub base_price: Money,
    pub view_direction: Option<ViewDirection>,
}

/// A hotel's room category and the physical rooms that belong to it.
///
/// The number of [`HotelRoom`] children never exceeds the declared inventory.
/// Children are persisted as their own rows; a repository loads them back
/// through [`RoomType::attach_hotel_rooms`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomType {
    id: RoomTypeId,
    #[serde(default)]
    version: Version,
    hotel_id: AccommodationId,
    profile: RoomProfile,
    description: String,
    amenities: Amenities,
    images: Vec<RoomImage>,
    inventory: RoomInventory,
    status: RoomStatus,
    base_price: Money,
    view_direction: Option<ViewDirection>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    /// Insertion ordered.
    #[serde(skip)]
    rooms: Vec<HotelRoom>,

    /// Children created or handed out mutably since the last load.
    #[serde(skip)]
    changed_rooms: HashSet<HotelRoomId>,

    #[serde(skip)]
    events: EventRecorder<RoomTypeEvent>,
}

impl Entity for RoomType {
    type Id = RoomTypeId;

    fn entity_type() -> &'static str {
        ENTITY
    }

    fn id(&self) -> RoomTypeId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn check_invariants(&self) -> DomainResult<()> {
        validate_images(&self.images)?;
        self.ensure_fits(self.rooms.len(), self.inventory, "load")
    }
}

impl AggregateRoot for RoomType {
    type Event = RoomTypeEvent;

    fn pull_domain_events(&mut self) -> Vec<RoomTypeEvent> {
        self.events.pull()
    }

    fn pending_events(&self) -> &[RoomTypeEvent] {
        self.events.pending()
    }
}

// Query methods
impl RoomType {
    pub fn hotel_id(&self) -> AccommodationId {
        self.hotel_id
    }

    pub fn profile(&self) -> &RoomProfile {
        &self.profile
    }

    pub fn name(&self) -> &str {
        self.profile.name()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amenities(&self) -> &Amenities {
        &self.amenities
    }

    pub fn images(&self) -> &[RoomImage] {
        &self.images
    }

    pub fn inventory(&self) -> RoomInventory {
        self.inventory
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn base_price(&self) -> &Money {
        &self.base_price
    }

    pub fn view_direction(&self) -> Option<ViewDirection> {
        self.view_direction
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Children in creation order.
    pub fn hotel_rooms(&self) -> &[HotelRoom] {
        &self.rooms
    }

    /// Number of rooms that can still be created under the cap.
    pub fn remaining_capacity(&self) -> u32 {
        let used = u32::try_from(self.rooms.len()).unwrap_or(u32::MAX);
        self.inventory.count().saturating_sub(used)
    }

    pub fn hotel_room(&self, id: HotelRoomId) -> DomainResult<&HotelRoom> {
        self.rooms
            .iter()
            .find(|room| room.id() == id)
            .ok_or_else(|| DomainError::not_found(HotelRoom::entity_type(), id))
    }

    /// Children this room type created or may have modified.
    ///
    /// Repositories write only these rows, so hotel rooms saved on their own
    /// in the meantime are not overwritten.
    pub fn changed_hotel_rooms(&self) -> impl Iterator<Item = &HotelRoom> {
        self.rooms
            .iter()
            .filter(|room| self.changed_rooms.contains(&room.id()))
    }
}

// Command methods
impl RoomType {
    /// Creates an ACTIVE room type with no physical rooms yet.
    pub fn create(props: NewRoomType, ids: &dyn IdGenerator) -> DomainResult<Self> {
        validate_images(&props.images)?;

        let id = RoomTypeId::generate(ids);
        let now = Utc::now();
        let mut room_type = Self {
            id,
            version: Version::initial(),
            hotel_id: props.hotel_id,
            profile: props.profile,
            description: props.description.trim().to_string(),
            amenities: props.amenities,
            images: props.images,
            inventory: props.inventory,
            status: RoomStatus::Active,
            base_price: props.base_price,
            view_direction: props.view_direction,
            created_at: now,
            updated_at: now,
            rooms: Vec::new(),
            changed_rooms: HashSet::new(),
            events: EventRecorder::new(),
        };
        room_type
            .events
            .record(RoomTypeEvent::RoomTypeCreated(RoomTypeCreatedData {
                room_type_id: id,
                hotel_id: room_type.hotel_id,
                inventory: room_type.inventory.count(),
                occurred_at: now,
            }));
        Ok(room_type)
    }

    /// Adds a physical room if the inventory cap allows it.
    ///
    /// Fails without touching the room type when the cap is reached or the
    /// room number is already taken. Returns a copy of the new room.
    pub fn create_hotel_room(
        &mut self,
        props: NewHotelRoom,
        ids: &dyn IdGenerator,
    ) -> DomainResult<HotelRoom> {
        if self.remaining_capacity() == 0 {
            tracing::debug!(
                room_type_id = %self.id,
                inventory = self.inventory.count(),
                "Hotel room rejected: inventory exhausted"
            );
            return Err(DomainError::invalid_operation(
                ENTITY,
                "create_hotel_room",
                format!(
                    "inventory exhausted: {} of {} rooms exist",
                    self.rooms.len(),
                    self.inventory
                ),
            ));
        }
        if self
            .rooms
            .iter()
            .any(|room| room.room_number() == &props.room_number)
        {
            return Err(DomainError::invalid_operation(
                ENTITY,
                "create_hotel_room",
                format!("room number {} already exists", props.room_number),
            ));
        }

        let room = HotelRoom::new(HotelRoomId::generate(ids), self.id, props);
        self.events
            .record(RoomTypeEvent::HotelRoomCreated(HotelRoomCreatedData {
                room_type_id: self.id,
                hotel_room_id: room.id(),
                room_number: room.room_number().to_string(),
                floor_id: room.floor_id(),
                occurred_at: room.created_at(),
            }));
        self.changed_rooms.insert(room.id());
        self.rooms.push(room.clone());
        self.updated_at = Utc::now();
        Ok(room)
    }

    pub fn hotel_room_mut(&mut self, id: HotelRoomId) -> DomainResult<&mut HotelRoom> {
        let room = self
            .rooms
            .iter_mut()
            .find(|room| room.id() == id)
            .ok_or_else(|| DomainError::not_found(HotelRoom::entity_type(), id))?;
        self.changed_rooms.insert(id);
        Ok(room)
    }

    /// Replaces the child collection with rooms loaded from storage.
    ///
    /// The attached rooms count as unchanged.
    pub fn attach_hotel_rooms(&mut self, rooms: Vec<HotelRoom>) -> DomainResult<()> {
        if let Some(foreign) = rooms.iter().find(|room| room.room_type_id() != self.id) {
            return Err(DomainError::invalid_operation(
                ENTITY,
                "attach_hotel_rooms",
                format!(
                    "hotel room {} belongs to room type {}",
                    foreign.id(),
                    foreign.room_type_id()
                ),
            ));
        }
        self.ensure_fits(rooms.len(), self.inventory, "attach_hotel_rooms")?;
        self.rooms = rooms;
        self.changed_rooms.clear();
        Ok(())
    }

    /// Changes the declared cap. It may not drop below the rooms that exist.
    pub fn adjust_inventory(&mut self, count: u32) -> DomainResult<()> {
        let inventory = RoomInventory::new(count).map_err(|err| match err {
            DomainError::InvalidInput { reason, .. } => {
                DomainError::invalid_operation(ENTITY, "adjust_inventory", reason)
            }
            other => other,
        })?;
        self.ensure_fits(self.rooms.len(), inventory, "adjust_inventory")?;
        if inventory == self.inventory {
            return Ok(());
        }

        let now = Utc::now();
        self.events
            .record(RoomTypeEvent::RoomTypeInventoryAdjusted(
                RoomTypeInventoryAdjustedData {
                    room_type_id: self.id,
                    previous: self.inventory.count(),
                    current: inventory.count(),
                    occurred_at: now,
                },
            ));
        self.inventory = inventory;
        self.updated_at = now;
        Ok(())
    }

    pub fn update_base_price(&mut self, price: Money) {
        self.base_price = price;
        self.touch();
    }

    pub fn update_description(&mut self, description: impl AsRef<str>) {
        self.description = description.as_ref().trim().to_string();
        self.touch();
    }

    pub fn update_amenities(&mut self, amenities: Amenities) {
        self.amenities = amenities;
        self.touch();
    }

    pub fn update_images(&mut self, images: Vec<RoomImage>) -> DomainResult<()> {
        validate_images(&images)?;
        self.images = images;
        self.touch();
        Ok(())
    }

    pub fn activate(&mut self) {
        self.set_status(RoomStatus::Active);
    }

    pub fn deactivate(&mut self) {
        self.set_status(RoomStatus::Inactive);
    }

    fn set_status(&mut self, status: RoomStatus) {
        if self.status != status {
            self.status = status;
            self.touch();
        }
    }

    fn ensure_fits(
        &self,
        rooms: usize,
        inventory: RoomInventory,
        operation: &'static str,
    ) -> DomainResult<()> {
        if rooms > inventory.count() as usize {
            return Err(DomainError::invalid_operation(
                ENTITY,
                operation,
                format!("{rooms} hotel rooms exceed inventory of {inventory}"),
            ));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_images(images: &[RoomImage]) -> DomainResult<()> {
    if images.len() < MIN_ROOM_TYPE_IMAGES {
        return Err(DomainError::invalid_input(
            "images",
            format!(
                "a room type needs at least {MIN_ROOM_TYPE_IMAGES} images, got {}",
                images.len()
            ),
        ));
    }
    Ok(())
}

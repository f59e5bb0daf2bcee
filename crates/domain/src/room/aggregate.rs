//! Homestay room aggregate.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use common::{AccommodationId, IdGenerator, RoomId, Version};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, Entity, EventRecorder};
use crate::error::{DomainError, DomainResult};
use crate::value_objects::{Amenities, RoomImage, RoomInventory};

use super::events::{RoomCreatedData, RoomEvent, RoomInventoryAdjustedData};
use super::{RoomProfile, RoomStatus};

const ENTITY: &str = "room";

/// Image count accepted when a room is created.
pub const ROOM_IMAGES_ON_CREATE: RangeInclusive<usize> = 2..=10;

const MAX_ROOM_IMAGES: usize = 10;

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub accommodation_id: AccommodationId,
    pub profile: RoomProfile,
    pub description: String,
    pub amenities: Amenities,
    pub images: Vec<RoomImage>,
    pub inventory: RoomInventory,
}

/// A homestay's sellable unit, standing for 1..N identical copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    #[serde(default)]
    version: Version,
    accommodation_id: AccommodationId,
    profile: RoomProfile,
    description: String,
    amenities: Amenities,
    images: Vec<RoomImage>,
    inventory: RoomInventory,
    status: RoomStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    #[serde(skip)]
    events: EventRecorder<RoomEvent>,
}

impl Entity for Room {
    type Id = RoomId;

    fn entity_type() -> &'static str {
        ENTITY
    }

    fn id(&self) -> RoomId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn check_invariants(&self) -> DomainResult<()> {
        validate_replacement_images(&self.images)
    }
}

impl AggregateRoot for Room {
    type Event = RoomEvent;

    fn pull_domain_events(&mut self) -> Vec<RoomEvent> {
        self.events.pull()
    }

    fn pending_events(&self) -> &[RoomEvent] {
        self.events.pending()
    }
}

impl Room {
    /// Creates an ACTIVE room.
    pub fn create(props: NewRoom, ids: &dyn IdGenerator) -> DomainResult<Self> {
        if !ROOM_IMAGES_ON_CREATE.contains(&props.images.len()) {
            return Err(DomainError::invalid_input(
                "images",
                format!(
                    "a room needs {} to {} images, got {}",
                    ROOM_IMAGES_ON_CREATE.start(),
                    ROOM_IMAGES_ON_CREATE.end(),
                    props.images.len()
                ),
            ));
        }

        let id = RoomId::generate(ids);
        let now = Utc::now();
        let mut room = Self {
            id,
            version: Version::initial(),
            accommodation_id: props.accommodation_id,
            profile: props.profile,
            description: props.description.trim().to_string(),
            amenities: props.amenities,
            images: props.images,
            inventory: props.inventory,
            status: RoomStatus::Active,
            created_at: now,
            updated_at: now,
            events: EventRecorder::new(),
        };
        room.events.record(RoomEvent::RoomCreated(RoomCreatedData {
            room_id: id,
            accommodation_id: room.accommodation_id,
            inventory: room.inventory.count(),
            occurred_at: now,
        }));
        Ok(room)
    }

    pub fn accommodation_id(&self) -> AccommodationId {
        self.accommodation_id
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

    pub fn is_active(&self) -> bool {
        self.status == RoomStatus::Active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn update_description(&mut self, description: impl AsRef<str>) {
        self.description = description.as_ref().trim().to_string();
        self.touch();
    }

    /// Replaces the amenity list. [`Amenities`] is already deduplicated.
    pub fn update_amenities(&mut self, amenities: Amenities) {
        self.amenities = amenities;
        self.touch();
    }

    pub fn update_images(&mut self, images: Vec<RoomImage>) -> DomainResult<()> {
        validate_replacement_images(&images)?;
        self.images = images;
        self.touch();
        Ok(())
    }

    pub fn activate(&mut self) {
        if self.status != RoomStatus::Active {
            self.status = RoomStatus::Active;
            self.touch();
        }
    }

    /// Takes the listing off sale.
    ///
    /// Only a single remaining unit may be deactivated; draw the inventory
    /// down first with [`Room::decrease_inventory`].
    pub fn deactivate(&mut self) -> DomainResult<()> {
        if self.status == RoomStatus::Inactive {
            return Ok(());
        }
        if self.inventory.count() != 1 {
            return Err(DomainError::invalid_state(
                ENTITY,
                "deactivate",
                format_args!("{} with inventory {}", self.status, self.inventory),
                "inventory of 1",
            ));
        }
        self.status = RoomStatus::Inactive;
        self.touch();
        Ok(())
    }

    pub fn adjust_inventory(&mut self, count: u32) -> DomainResult<()> {
        let inventory = RoomInventory::new(count)?;
        self.set_inventory(inventory);
        Ok(())
    }

    pub fn increase_inventory(&mut self, by: u32) -> DomainResult<()> {
        let inventory = self.inventory.increase(by)?;
        self.set_inventory(inventory);
        Ok(())
    }

    pub fn decrease_inventory(&mut self, by: u32) -> DomainResult<()> {
        let inventory = self.inventory.decrease(by)?;
        self.set_inventory(inventory);
        Ok(())
    }

    fn set_inventory(&mut self, inventory: RoomInventory) {
        if inventory == self.inventory {
            return;
        }
        let now = Utc::now();
        self.events
            .record(RoomEvent::RoomInventoryAdjusted(RoomInventoryAdjustedData {
                room_id: self.id,
                previous: self.inventory.count(),
                current: inventory.count(),
                occurred_at: now,
            }));
        self.inventory = inventory;
        self.updated_at = now;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_replacement_images(images: &[RoomImage]) -> DomainResult<()> {
    if images.is_empty() {
        return Err(DomainError::invalid_input("images", "must not be empty"));
    }
    if images.len() > MAX_ROOM_IMAGES {
        return Err(DomainError::invalid_input(
            "images",
            format!("at most {MAX_ROOM_IMAGES} images, got {}", images.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value_objects::{BedType, GuestCapacity, RoomCategory};
    use common::SequentialIdGenerator;

    fn images(count: usize) -> Vec<RoomImage> {
        (0..count)
            .map(|i| RoomImage::new(format!("https://cdn.example/room/{i}.jpg"), i as u32).unwrap())
            .collect()
    }

    fn props(image_count: usize, inventory: u32) -> NewRoom {
        NewRoom {
            accommodation_id: AccommodationId::new(),
            profile: RoomProfile::new(
                "Garden room",
                RoomCategory::Standard,
                22.0,
                GuestCapacity::new(2, 1).unwrap(),
                1,
                BedType::Queen,
            )
            .unwrap(),
            description: "Quiet".to_string(),
            amenities: Amenities::new(["wifi", "fan", "wifi"]).unwrap(),
            images: images(image_count),
            inventory: RoomInventory::new(inventory).unwrap(),
        }
    }

    fn room(inventory: u32) -> Room {
        Room::create(props(2, inventory), &SequentialIdGenerator::new()).unwrap()
    }

    #[test]
    fn test_create_enforces_image_bounds() {
        let ids = SequentialIdGenerator::new();
        for count in [0, 1, 11] {
            let err = Room::create(props(count, 1), &ids).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput { field: "images", .. }));
        }
        for count in [2, 10] {
            assert!(Room::create(props(count, 1), &ids).is_ok());
        }
    }

    #[test]
    fn test_create_records_event() {
        let mut room = room(3);
        assert_eq!(room.status(), RoomStatus::Active);
        assert_eq!(room.amenities().as_slice(), ["wifi", "fan"]);

        let events = room.pull_domain_events();
        assert!(matches!(
            &events[..],
            [RoomEvent::RoomCreated(data)] if data.inventory == 3 && data.room_id == room.id()
        ));
    }

    #[test]
    fn test_deactivate_single_unit() {
        let mut room = room(1);
        room.deactivate().unwrap();
        assert_eq!(room.status(), RoomStatus::Inactive);
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let mut room = room(1);
        room.deactivate().unwrap();
        let updated_at = room.updated_at();

        room.deactivate().unwrap();
        assert_eq!(room.status(), RoomStatus::Inactive);
        assert_eq!(room.updated_at(), updated_at);
    }

    #[test]
    fn test_deactivate_with_several_units_fails() {
        let mut room = room(3);
        let err = room.deactivate().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(room.status(), RoomStatus::Active);

        room.decrease_inventory(2).unwrap();
        room.deactivate().unwrap();
        assert!(!room.is_active());
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut room = room(1);
        room.activate();
        assert!(room.is_active());
        room.deactivate().unwrap();
        room.activate();
        room.activate();
        assert!(room.is_active());
    }

    #[test]
    fn test_inventory_adjustments_record_changes() {
        let mut room = room(2);
        room.pull_domain_events();

        room.increase_inventory(3).unwrap();
        room.adjust_inventory(5).unwrap();
        room.decrease_inventory(4).unwrap();

        assert_eq!(room.inventory().count(), 1);
        let events = room.pull_domain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[1],
            RoomEvent::RoomInventoryAdjusted(data) if data.previous == 5 && data.current == 1
        ));
    }

    #[test]
    fn test_inventory_floor_is_kept() {
        let mut room = room(2);
        assert!(room.decrease_inventory(2).is_err());
        assert!(room.adjust_inventory(0).is_err());
        assert_eq!(room.inventory().count(), 2);
    }

    #[test]
    fn test_update_images() {
        let mut room = room(1);
        assert!(room.update_images(Vec::new()).is_err());
        assert!(room.update_images(images(11)).is_err());

        room.update_images(images(1)).unwrap();
        assert_eq!(room.images().len(), 1);
    }

    #[test]
    fn test_serialization_round_trip() {
        let room = room(4);
        let json = serde_json::to_value(&room).unwrap();
        let restored: Room = serde_json::from_value(json.clone()).unwrap();

        assert_eq!(serde_json::to_value(&restored).unwrap(), json);
        assert!(restored.pending_events().is_empty());
    }
}

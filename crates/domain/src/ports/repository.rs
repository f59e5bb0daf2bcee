use std::any::Any;
use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use common::{AccommodationId, FloorId, HotelRoomId, RoomId, RoomTypeId, UserId, Version};
use thiserror::Error;

use crate::accommodation::{Accommodation, AccommodationType};
use crate::error::DomainError;
use crate::floor::Floor;
use crate::room::{Room, RoomStatus};
use crate::room_type::{HotelRoom, HotelRoomStatus, RoomType};

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The stored version moved on since the caller loaded the entity.
    #[error("Concurrency conflict for {entity} {id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        entity: &'static str,
        id: String,
        expected: Version,
        actual: Version,
    },

    /// Committing would leave more hotel rooms than the room type's inventory.
    #[error("Room type {room_type_id} would hold {rooms} hotel rooms, inventory is {inventory}")]
    CapacityExceeded {
        room_type_id: RoomTypeId,
        rooms: usize,
        inventory: u32,
    },

    /// Another row already holds a key that must be unique within its parent.
    #[error("{entity} {key} already exists")]
    Duplicate { entity: &'static str, key: String },

    #[error("{entity} repository does not support pessimistic locking")]
    LockingUnsupported { entity: &'static str },

    /// A stored row no longer satisfies the domain rules.
    #[error("Stored data failed validation: {0}")]
    Corrupted(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        RepositoryError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            RepositoryError::ConcurrencyConflict { .. } | RepositoryError::CapacityExceeded { .. }
        )
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Keeps a pessimistic lock alive. The lock is released when this is dropped.
pub struct LockLease(Box<dyn Any + Send + Sync>);

impl LockLease {
    pub fn new<G: Any + Send + Sync>(guard: G) -> Self {
        Self(Box::new(guard))
    }
}

impl std::fmt::Debug for LockLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LockLease")
    }
}

/// An entity loaded under a pessimistic write lock.
///
/// Derefs to the entity, so it can be mutated and passed to `save` directly.
/// Other `lock_by_id` callers for the same id wait until this is dropped.
#[derive(Debug)]
pub struct Locked<T> {
    value: T,
    _lease: LockLease,
}

impl<T> Locked<T> {
    pub fn new(value: T, lease: LockLease) -> Self {
        Self {
            value,
            _lease: lease,
        }
    }

    /// Releases the lock and returns the entity.
    pub fn release(self) -> T {
        self.value
    }
}

impl<T> Deref for Locked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Locked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// Offset pagination for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    pub const DEFAULT_LIMIT: usize = 50;

    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomFilter {
    pub accommodation_id: Option<AccommodationId>,
    pub status: Option<RoomStatus>,
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        self.accommodation_id
            .is_none_or(|id| room.accommodation_id() == id)
            && self.status.is_none_or(|status| room.status() == status)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomTypeFilter {
    pub hotel_id: Option<AccommodationId>,
    pub status: Option<RoomStatus>,
}

impl RoomTypeFilter {
    pub fn matches(&self, room_type: &RoomType) -> bool {
        self.hotel_id.is_none_or(|id| room_type.hotel_id() == id)
            && self.status.is_none_or(|status| room_type.status() == status)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HotelRoomFilter {
    pub room_type_id: Option<RoomTypeId>,
    pub floor_id: Option<FloorId>,
    pub status: Option<HotelRoomStatus>,
}

impl HotelRoomFilter {
    pub fn matches(&self, room: &HotelRoom) -> bool {
        self.room_type_id
            .is_none_or(|id| room.room_type_id() == id)
            && self.floor_id.is_none_or(|id| room.floor_id() == Some(id))
            && self.status.is_none_or(|status| room.status() == status)
    }
}

/// Persistence for accommodations.
///
/// `save` stores the entity if the caller's version matches the stored one
/// (or the entity is new) and stamps the new version on the entity.
#[async_trait]
pub trait AccommodationRepository: Send + Sync {
    async fn save(&self, accommodation: &mut Accommodation) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: AccommodationId) -> RepositoryResult<Option<Accommodation>>;

    async fn find_by_owner_id(&self, owner_id: UserId) -> RepositoryResult<Vec<Accommodation>>;

    async fn find_by_type(
        &self,
        accommodation_type: AccommodationType,
    ) -> RepositoryResult<Vec<Accommodation>>;

    async fn find_all(&self, page: Page) -> RepositoryResult<Vec<Accommodation>>;

    /// Removes the accommodation. Fails with `NotFound` if it does not exist.
    async fn delete(&self, id: AccommodationId) -> RepositoryResult<()>;

    /// Loads the accommodation under a write lock.
    ///
    /// Optional; callers fall back to optimistic saves on `LockingUnsupported`.
    async fn lock_by_id(&self, id: AccommodationId) -> RepositoryResult<Locked<Accommodation>> {
        let _ = id;
        Err(RepositoryError::LockingUnsupported {
            entity: "accommodation",
        })
    }
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn save(&self, room: &mut Room) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: RoomId) -> RepositoryResult<Option<Room>>;

    async fn find_by_accommodation_id(
        &self,
        accommodation_id: AccommodationId,
    ) -> RepositoryResult<Vec<Room>>;

    async fn lock_by_id(&self, id: RoomId) -> RepositoryResult<Locked<Room>>;

    async fn find_many(&self, page: Page, filter: RoomFilter) -> RepositoryResult<Vec<Room>>;

    async fn count(&self, filter: RoomFilter) -> RepositoryResult<usize>;
}

/// Persistence for room types and their hotel rooms.
///
/// Room types come back with their hotel rooms attached. Saving a room type
/// also saves its hotel rooms and fails with `CapacityExceeded` if the stored
/// children would outnumber the inventory.
#[async_trait]
pub trait RoomTypeRepository: Send + Sync {
    async fn save(&self, room_type: &mut RoomType) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: RoomTypeId) -> RepositoryResult<Option<RoomType>>;

    async fn find_by_hotel_id(&self, hotel_id: AccommodationId)
    -> RepositoryResult<Vec<RoomType>>;

    async fn lock_by_id(&self, id: RoomTypeId) -> RepositoryResult<Locked<RoomType>>;

    async fn find_many(&self, page: Page, filter: RoomTypeFilter)
    -> RepositoryResult<Vec<RoomType>>;

    async fn count(&self, filter: RoomTypeFilter) -> RepositoryResult<usize>;

    /// Saves one hotel room. A new room is checked against its room type's cap.
    async fn save_hotel_room(&self, room: &mut HotelRoom) -> RepositoryResult<()>;

    async fn find_hotel_room_by_id(&self, id: HotelRoomId) -> RepositoryResult<Option<HotelRoom>>;

    /// Returns the room type's hotel rooms in creation order.
    async fn find_hotel_rooms_by_type(
        &self,
        room_type_id: RoomTypeId,
    ) -> RepositoryResult<Vec<HotelRoom>>;

    async fn lock_hotel_room_by_id(&self, id: HotelRoomId) -> RepositoryResult<Locked<HotelRoom>>;

    async fn find_many_hotel_rooms(
        &self,
        page: Page,
        filter: HotelRoomFilter,
    ) -> RepositoryResult<Vec<HotelRoom>>;

    async fn count_hotel_rooms(&self, filter: HotelRoomFilter) -> RepositoryResult<usize>;
}

#[async_trait]
pub trait FloorRepository: Send + Sync {
    async fn save(&self, floor: &mut Floor) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: FloorId) -> RepositoryResult<Option<Floor>>;

    /// Returns floors ordered by floor number.
    async fn find_by_accommodation_id(
        &self,
        accommodation_id: AccommodationId,
    ) -> RepositoryResult<Vec<Floor>>;

    async fn delete(&self, id: FloorId) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_is_released_on_drop() {
        let mutex = std::sync::Arc::new(std::sync::Mutex::new(()));
        let witness = std::sync::Arc::clone(&mutex);

        let mut locked = Locked::new(5_u32, LockLease::new(witness));
        *locked += 1;
        assert_eq!(*locked, 6);
        assert_eq!(std::sync::Arc::strong_count(&mutex), 2);

        assert_eq!(locked.release(), 6);
        assert_eq!(std::sync::Arc::strong_count(&mutex), 1);
    }

    #[test]
    fn conflicts_are_flagged() {
        let conflict = RepositoryError::ConcurrencyConflict {
            entity: "room",
            id: "r1".to_string(),
            expected: Version::new(1),
            actual: Version::new(2),
        };
        assert!(conflict.is_conflict());
        assert!(!RepositoryError::not_found("room", "r1").is_conflict());
        assert_eq!(
            conflict.to_string(),
            "Concurrency conflict for room r1: expected version 1, found 2"
        );
    }
}

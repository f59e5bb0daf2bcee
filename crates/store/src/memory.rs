use std::sync::Arc;

use async_trait::async_trait;
use common::{AccommodationId, FloorId, HotelRoomId, RoomId, RoomTypeId, UserId};
use domain::ports::{
    AccommodationRepository, FloorRepository, HotelRoomFilter, Locked, Page, RepositoryError,
    RepositoryResult, RoomFilter, RoomRepository, RoomTypeFilter, RoomTypeRepository,
};
use domain::{Accommodation, AccommodationType, Entity, Floor, HotelRoom, Room, RoomType};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::locks::LockRegistry;
use crate::table::{Table, encode};

#[derive(Debug)]
struct Tables {
    accommodations: Table,
    floors: Table,
    rooms: Table,
    room_types: Table,
    hotel_rooms: Table,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            accommodations: Table::new(Accommodation::entity_type()),
            floors: Table::new(Floor::entity_type()),
            rooms: Table::new(Room::entity_type()),
            room_types: Table::new(RoomType::entity_type()),
            hotel_rooms: Table::new(HotelRoom::entity_type()),
        }
    }
}

impl Tables {
    fn load_room_type(&self, id: Uuid) -> RepositoryResult<Option<RoomType>> {
        let Some(row) = self.room_types.get(id) else {
            return Ok(None);
        };
        let mut room_type: RoomType = row.load()?;
        let rooms = self
            .hotel_rooms
            .children_of(id)
            .into_iter()
            .map(|row| row.load())
            .collect::<RepositoryResult<Vec<HotelRoom>>>()?;
        room_type.attach_hotel_rooms(rooms)?;
        Ok(Some(room_type))
    }

    fn load_room_types(&self) -> RepositoryResult<Vec<RoomType>> {
        let mut room_types = Vec::new();
        for id in self.room_types.ordered_ids() {
            if let Some(room_type) = self.load_room_type(id)? {
                room_types.push(room_type);
            }
        }
        Ok(room_types)
    }
}

/// In-memory implementation of every lodging repository.
///
/// Entities are stored as JSON rows with a version, so loading always goes
/// through deserialization and validation. Cloning shares the underlying
/// storage.
#[derive(Clone, Default)]
pub struct InMemoryLodgingStore {
    tables: Arc<RwLock<Tables>>,
    locks: Arc<LockRegistry>,
}

impl InMemoryLodgingStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of hotel rooms stored for a room type.
    pub async fn hotel_room_count(&self, room_type_id: RoomTypeId) -> usize {
        self.tables
            .read()
            .await
            .hotel_rooms
            .count_children(room_type_id.as_uuid())
    }

    async fn locked<T>(
        &self,
        entity: &'static str,
        id: Uuid,
        load: impl FnOnce(&Tables) -> RepositoryResult<Option<T>>,
    ) -> RepositoryResult<Locked<T>> {
        let lease = self.locks.acquire(entity, id).await;
        let tables = self.tables.read().await;
        let value = load(&tables)?.ok_or_else(|| RepositoryError::not_found(entity, id))?;
        Ok(Locked::new(value, lease))
    }
}

fn paginate<T>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items.skip(page.offset).take(page.limit).collect()
}

#[async_trait]
impl AccommodationRepository for InMemoryLodgingStore {
    async fn save(&self, accommodation: &mut Accommodation) -> RepositoryResult<()> {
        let id = accommodation.id().as_uuid();
        let mut tables = self.tables.write().await;
        let next = tables
            .accommodations
            .check_version(id, accommodation.version())?;
        accommodation.set_version(next);
        let state = encode(&*accommodation)?;
        tables.accommodations.upsert(id, next, None, state);
        Ok(())
    }

    async fn find_by_id(&self, id: AccommodationId) -> RepositoryResult<Option<Accommodation>> {
        let tables = self.tables.read().await;
        tables
            .accommodations
            .get(id.as_uuid())
            .map(|row| row.load())
            .transpose()
    }

    async fn find_by_owner_id(&self, owner_id: UserId) -> RepositoryResult<Vec<Accommodation>> {
        let tables = self.tables.read().await;
        let all: Vec<Accommodation> = tables.accommodations.load_all()?;
        Ok(all.into_iter().filter(|a| a.is_owned_by(owner_id)).collect())
    }

    async fn find_by_type(
        &self,
        accommodation_type: AccommodationType,
    ) -> RepositoryResult<Vec<Accommodation>> {
        let tables = self.tables.read().await;
        let all: Vec<Accommodation> = tables.accommodations.load_all()?;
        Ok(all
            .into_iter()
            .filter(|a| a.accommodation_type() == accommodation_type)
            .collect())
    }

    async fn find_all(&self, page: Page) -> RepositoryResult<Vec<Accommodation>> {
        let tables = self.tables.read().await;
        let all: Vec<Accommodation> = tables.accommodations.load_all()?;
        Ok(paginate(all.into_iter(), page))
    }

    async fn delete(&self, id: AccommodationId) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        tables.accommodations.remove(id.as_uuid())?;
        tracing::debug!(accommodation_id = %id, "Deleted accommodation");
        Ok(())
    }

    async fn lock_by_id(&self, id: AccommodationId) -> RepositoryResult<Locked<Accommodation>> {
        self.locked(Accommodation::entity_type(), id.as_uuid(), |tables| {
            tables
                .accommodations
                .get(id.as_uuid())
                .map(|row| row.load())
                .transpose()
        })
        .await
    }
}

#[async_trait]
impl RoomRepository for InMemoryLodgingStore {
    async fn save(&self, room: &mut Room) -> RepositoryResult<()> {
        let id = room.id().as_uuid();
        let mut tables = self.tables.write().await;
        let next = tables.rooms.check_version(id, room.version())?;
        room.set_version(next);
        let state = encode(&*room)?;
        tables
            .rooms
            .upsert(id, next, Some(room.accommodation_id().as_uuid()), state);
        Ok(())
    }

    async fn find_by_id(&self, id: RoomId) -> RepositoryResult<Option<Room>> {
        let tables = self.tables.read().await;
        tables.rooms.get(id.as_uuid()).map(|row| row.load()).transpose()
    }

    async fn find_by_accommodation_id(
        &self,
        accommodation_id: AccommodationId,
    ) -> RepositoryResult<Vec<Room>> {
        let tables = self.tables.read().await;
        tables
            .rooms
            .children_of(accommodation_id.as_uuid())
            .into_iter()
            .map(|row| row.load())
            .collect()
    }

    async fn lock_by_id(&self, id: RoomId) -> RepositoryResult<Locked<Room>> {
        self.locked(Room::entity_type(), id.as_uuid(), |tables| {
            tables.rooms.get(id.as_uuid()).map(|row| row.load()).transpose()
        })
        .await
    }

    async fn find_many(&self, page: Page, filter: RoomFilter) -> RepositoryResult<Vec<Room>> {
        let tables = self.tables.read().await;
        let all: Vec<Room> = tables.rooms.load_all()?;
        Ok(paginate(
            all.into_iter().filter(|room| filter.matches(room)),
            page,
        ))
    }

    async fn count(&self, filter: RoomFilter) -> RepositoryResult<usize> {
        let tables = self.tables.read().await;
        let all: Vec<Room> = tables.rooms.load_all()?;
        Ok(all.iter().filter(|room| filter.matches(room)).count())
    }
}

#[async_trait]
impl RoomTypeRepository for InMemoryLodgingStore {
    /// Saves the room type and the hotel rooms it created or changed in one
    /// commit.
    ///
    /// Hotel rooms the room type did not touch are left as stored and reloaded
    /// into it afterwards, so housekeeping saves on sibling rooms never
    /// conflict with it. The hotel rooms already stored for this room type
    /// count against the inventory too, so a writer holding a stale child list
    /// cannot push the total over the cap.
    async fn save(&self, room_type: &mut RoomType) -> RepositoryResult<()> {
        let id = room_type.id().as_uuid();
        let mut tables = self.tables.write().await;

        let next = tables.room_types.check_version(id, room_type.version())?;
        let mut changed = Vec::new();
        for room in room_type.changed_hotel_rooms() {
            let room_id = room.id().as_uuid();
            let version = tables.hotel_rooms.check_version(room_id, room.version())?;
            changed.push((room_id, version, encode(room)?));
        }

        let unsaved = room_type
            .changed_hotel_rooms()
            .filter(|room| !tables.hotel_rooms.contains(room.id().as_uuid()))
            .count();
        let total = tables.hotel_rooms.count_children(id) + unsaved;
        let inventory = room_type.inventory().count();
        if total > inventory as usize {
            tracing::warn!(
                room_type_id = %room_type.id(),
                total,
                inventory,
                "Rejected room type save over inventory"
            );
            metrics::counter!("store_capacity_rejections_total").increment(1);
            return Err(RepositoryError::CapacityExceeded {
                room_type_id: room_type.id(),
                rooms: total,
                inventory,
            });
        }

        room_type.set_version(next);
        let state = encode(&*room_type)?;
        let hotel_id = room_type.hotel_id().as_uuid();
        for (room_id, version, room_state) in changed {
            tables
                .hotel_rooms
                .upsert(room_id, version, Some(id), room_state);
        }
        tables.room_types.upsert(id, next, Some(hotel_id), state);

        let stored = tables
            .hotel_rooms
            .children_of(id)
            .into_iter()
            .map(|row| row.load())
            .collect::<RepositoryResult<Vec<HotelRoom>>>()?;
        room_type.attach_hotel_rooms(stored)?;
        Ok(())
    }

    async fn find_by_id(&self, id: RoomTypeId) -> RepositoryResult<Option<RoomType>> {
        self.tables.read().await.load_room_type(id.as_uuid())
    }

    async fn find_by_hotel_id(
        &self,
        hotel_id: AccommodationId,
    ) -> RepositoryResult<Vec<RoomType>> {
        let tables = self.tables.read().await;
        let all = tables.load_room_types()?;
        Ok(all
            .into_iter()
            .filter(|room_type| room_type.hotel_id() == hotel_id)
            .collect())
    }

    async fn lock_by_id(&self, id: RoomTypeId) -> RepositoryResult<Locked<RoomType>> {
        self.locked(RoomType::entity_type(), id.as_uuid(), |tables| {
            tables.load_room_type(id.as_uuid())
        })
        .await
    }

    async fn find_many(
        &self,
        page: Page,
        filter: RoomTypeFilter,
    ) -> RepositoryResult<Vec<RoomType>> {
        let tables = self.tables.read().await;
        let all = tables.load_room_types()?;
        Ok(paginate(
            all.into_iter().filter(|room_type| filter.matches(room_type)),
            page,
        ))
    }

    async fn count(&self, filter: RoomTypeFilter) -> RepositoryResult<usize> {
        let tables = self.tables.read().await;
        let all: Vec<RoomType> = tables.room_types.load_all()?;
        Ok(all
            .iter()
            .filter(|room_type| filter.matches(room_type))
            .count())
    }

    async fn save_hotel_room(&self, room: &mut HotelRoom) -> RepositoryResult<()> {
        let id = room.id().as_uuid();
        let parent = room.room_type_id();
        let mut tables = self.tables.write().await;
        let next = tables.hotel_rooms.check_version(id, room.version())?;

        if !tables.hotel_rooms.contains(id) {
            let room_type: RoomType = tables
                .room_types
                .get(parent.as_uuid())
                .ok_or_else(|| RepositoryError::not_found(RoomType::entity_type(), parent))?
                .load()?;
            let rooms = tables.hotel_rooms.count_children(parent.as_uuid()) + 1;
            let inventory = room_type.inventory().count();
            if rooms > inventory as usize {
                metrics::counter!("store_capacity_rejections_total").increment(1);
                return Err(RepositoryError::CapacityExceeded {
                    room_type_id: parent,
                    rooms,
                    inventory,
                });
            }
        }

        room.set_version(next);
        let state = encode(&*room)?;
        tables
            .hotel_rooms
            .upsert(id, next, Some(parent.as_uuid()), state);
        Ok(())
    }

    async fn find_hotel_room_by_id(&self, id: HotelRoomId) -> RepositoryResult<Option<HotelRoom>> {
        let tables = self.tables.read().await;
        tables
            .hotel_rooms
            .get(id.as_uuid())
            .map(|row| row.load())
            .transpose()
    }

    async fn find_hotel_rooms_by_type(
        &self,
        room_type_id: RoomTypeId,
    ) -> RepositoryResult<Vec<HotelRoom>> {
        let tables = self.tables.read().await;
        tables
            .hotel_rooms
            .children_of(room_type_id.as_uuid())
            .into_iter()
            .map(|row| row.load())
            .collect()
    }

    async fn lock_hotel_room_by_id(&self, id: HotelRoomId) -> RepositoryResult<Locked<HotelRoom>> {
        self.locked(HotelRoom::entity_type(), id.as_uuid(), |tables| {
            tables
                .hotel_rooms
                .get(id.as_uuid())
                .map(|row| row.load())
                .transpose()
        })
        .await
    }

    async fn find_many_hotel_rooms(
        &self,
        page: Page,
        filter: HotelRoomFilter,
    ) -> RepositoryResult<Vec<HotelRoom>> {
        let tables = self.tables.read().await;
        let all: Vec<HotelRoom> = tables.hotel_rooms.load_all()?;
        Ok(paginate(
            all.into_iter().filter(|room| filter.matches(room)),
            page,
        ))
    }

    async fn count_hotel_rooms(&self, filter: HotelRoomFilter) -> RepositoryResult<usize> {
        let tables = self.tables.read().await;
        let all: Vec<HotelRoom> = tables.hotel_rooms.load_all()?;
        Ok(all.iter().filter(|room| filter.matches(room)).count())
    }
}

#[async_trait]
impl FloorRepository for InMemoryLodgingStore {
    /// Floor numbers are unique per accommodation; the check runs inside the
    /// commit.
    async fn save(&self, floor: &mut Floor) -> RepositoryResult<()> {
        let id = floor.id().as_uuid();
        let parent = floor.accommodation_id().as_uuid();
        let mut tables = self.tables.write().await;
        let next = tables.floors.check_version(id, floor.version())?;

        for row in tables.floors.children_of(parent) {
            let other: Floor = row.load()?;
            if other.id() != floor.id() && other.floor_number() == floor.floor_number() {
                tracing::debug!(
                    accommodation_id = %floor.accommodation_id(),
                    floor_number = floor.floor_number(),
                    "Rejected duplicate floor number"
                );
                return Err(RepositoryError::Duplicate {
                    entity: Floor::entity_type(),
                    key: format!("number {}", floor.floor_number()),
                });
            }
        }
        floor.set_version(next);
        let state = encode(&*floor)?;
        tables.floors.upsert(id, next, Some(parent), state);
        Ok(())
    }

    async fn find_by_id(&self, id: FloorId) -> RepositoryResult<Option<Floor>> {
        let tables = self.tables.read().await;
        tables.floors.get(id.as_uuid()).map(|row| row.load()).transpose()
    }

    async fn find_by_accommodation_id(
        &self,
        accommodation_id: AccommodationId,
    ) -> RepositoryResult<Vec<Floor>> {
        let tables = self.tables.read().await;
        let mut floors = tables
            .floors
            .children_of(accommodation_id.as_uuid())
            .into_iter()
            .map(|row| row.load())
            .collect::<RepositoryResult<Vec<Floor>>>()?;
        floors.sort_by_key(Floor::floor_number);
        Ok(floors)
    }

    async fn delete(&self, id: FloorId) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        tables.floors.remove(id.as_uuid())?;
        Ok(())
    }
}

//! Homestay rooms and their inventory.

use std::sync::Arc;

use common::{IdGenerator, RandomIdGenerator, RoomId, UserId};
use domain::ports::{
    AccommodationRepository, AuthorizationPort, EventPublisher, Locked, Page, RoomFilter,
    RoomRepository,
};
use domain::{DomainResult, Entity, LodgingPolicy, NewRoom, Room};

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::locking::bounded;
use crate::publishing::{drain, publish};

use super::{ensure_manager, load_parent};

pub struct RoomService<H, R, P, A>
where
    H: AccommodationRepository,
    R: RoomRepository,
    P: EventPublisher,
    A: AuthorizationPort,
{
    accommodations: H,
    rooms: R,
    publisher: P,
    authorization: A,
    ids: Arc<dyn IdGenerator>,
    config: Config,
}

impl<H, R, P, A> RoomService<H, R, P, A>
where
    H: AccommodationRepository,
    R: RoomRepository,
    P: EventPublisher,
    A: AuthorizationPort,
{
    pub fn new(
        accommodations: H,
        rooms: R,
        publisher: P,
        authorization: A,
        config: Config,
    ) -> Self {
        Self {
            accommodations,
            rooms,
            publisher,
            authorization,
            ids: Arc::new(RandomIdGenerator),
            config,
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Adds a room to a homestay the actor manages.
    #[tracing::instrument(skip(self, props), fields(accommodation_id = %props.accommodation_id))]
    pub async fn create_room(&self, actor: UserId, props: NewRoom) -> ServiceResult<Room> {
        let homestay = load_parent(&self.accommodations, props.accommodation_id).await?;
        LodgingPolicy.ensure_can_add_room(&homestay)?;
        ensure_manager(&self.authorization, &homestay, actor).await?;

        let mut room = Room::create(props, self.ids.as_ref())?;
        self.rooms.save(&mut room).await?;
        let envelopes = drain(&mut room)?;
        publish(&self.publisher, envelopes).await?;

        tracing::info!(room_id = %room.id(), inventory = room.inventory().count(), "Created room");
        Ok(room)
    }

    pub async fn get_room(&self, id: RoomId) -> ServiceResult<Room> {
        self.rooms
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(Room::entity_type(), id))
    }

    pub async fn list_rooms(&self, page: Page, filter: RoomFilter) -> ServiceResult<Vec<Room>> {
        Ok(self.rooms.find_many(page, filter).await?)
    }

    pub async fn count_rooms(&self, filter: RoomFilter) -> ServiceResult<usize> {
        Ok(self.rooms.count(filter).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn adjust_inventory(&self, id: RoomId, count: u32) -> ServiceResult<Room> {
        self.modify(id, |room| room.adjust_inventory(count)).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn increase_inventory(&self, id: RoomId, by: u32) -> ServiceResult<Room> {
        self.modify(id, |room| room.increase_inventory(by)).await
    }

    /// Takes copies off sale. The inventory never drops below one.
    #[tracing::instrument(skip(self))]
    pub async fn decrease_inventory(&self, id: RoomId, by: u32) -> ServiceResult<Room> {
        self.modify(id, |room| room.decrease_inventory(by)).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, id: RoomId) -> ServiceResult<Room> {
        self.modify(id, |room| {
            room.activate();
            Ok(())
        })
        .await
    }

    /// Deactivates a room whose inventory is down to its last copy.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate(&self, id: RoomId) -> ServiceResult<Room> {
        self.modify(id, Room::deactivate).await
    }

    async fn modify(
        &self,
        id: RoomId,
        apply: impl FnOnce(&mut Room) -> DomainResult<()> + Send,
    ) -> ServiceResult<Room> {
        let lock = self.rooms.lock_by_id(id);
        let mut room = bounded(Room::entity_type(), id, self.config.lock_timeout, lock).await?;
        apply(&mut *room)?;
        self.rooms.save(&mut *room).await?;
        let envelopes = drain(&mut *room)?;
        let room = Locked::release(room);

        publish(&self.publisher, envelopes).await?;
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use common::SequentialIdGenerator;
    use domain::{Accommodation, AccommodationType, RoomStatus};
    use store::{InMemoryDirectory, InMemoryEventPublisher, InMemoryLodgingStore};

    use super::*;
    use crate::error::ErrorKind;
    use crate::fixtures::{new_accommodation, new_room};

    type Service = RoomService<
        InMemoryLodgingStore,
        InMemoryLodgingStore,
        InMemoryEventPublisher,
        InMemoryDirectory,
    >;

    async fn setup(
        accommodation_type: AccommodationType,
    ) -> (Service, InMemoryEventPublisher, Accommodation, UserId) {
        let store = InMemoryLodgingStore::new();
        let publisher = InMemoryEventPublisher::new();
        let owner = UserId::new();
        let mut accommodation =
            Accommodation::create(new_accommodation(accommodation_type, owner), &RandomIdGenerator)
                .unwrap();
        AccommodationRepository::save(&store, &mut accommodation)
            .await
            .unwrap();

        let service = RoomService::new(
            store.clone(),
            store,
            publisher.clone(),
            InMemoryDirectory::new(),
            Config::default(),
        )
        .with_id_generator(Arc::new(SequentialIdGenerator::new()));
        (service, publisher, accommodation, owner)
    }

    #[tokio::test]
    async fn rooms_belong_to_homestays_only() {
        let (service, _, hotel, owner) = setup(AccommodationType::Hotel).await;
        let err = service
            .create_room(owner, new_room(hotel.id(), 2))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[tokio::test]
    async fn inventory_changes_are_published() {
        let (service, publisher, homestay, owner) = setup(AccommodationType::Homestay).await;
        let room = service
            .create_room(owner, new_room(homestay.id(), 2))
            .await
            .unwrap();

        service.increase_inventory(room.id(), 3).await.unwrap();
        service.adjust_inventory(room.id(), 5).await.unwrap();
        let room = service.decrease_inventory(room.id(), 4).await.unwrap();
        assert_eq!(room.inventory().count(), 1);
        assert_eq!(room.version().as_i64(), 4);

        assert_eq!(
            publisher.published_types(),
            ["RoomCreated", "RoomInventoryAdjusted", "RoomInventoryAdjusted"]
        );
    }

    #[tokio::test]
    async fn deactivate_needs_last_copy() {
        let (service, _, homestay, owner) = setup(AccommodationType::Homestay).await;
        let room = service
            .create_room(owner, new_room(homestay.id(), 3))
            .await
            .unwrap();

        let err = service.deactivate(room.id()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        service.adjust_inventory(room.id(), 1).await.unwrap();
        let inactive = service.deactivate(room.id()).await.unwrap();
        assert_eq!(inactive.status(), RoomStatus::Inactive);
        let again = service.deactivate(room.id()).await.unwrap();
        assert_eq!(again.status(), RoomStatus::Inactive);

        let filter = RoomFilter {
            accommodation_id: Some(homestay.id()),
            status: Some(RoomStatus::Inactive),
        };
        assert_eq!(service.count_rooms(filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn decrease_below_one_is_rejected() {
        let (service, _, homestay, owner) = setup(AccommodationType::Homestay).await;
        let room = service
            .create_room(owner, new_room(homestay.id(), 2))
            .await
            .unwrap();

        assert!(service.decrease_inventory(room.id(), 2).await.is_err());
        assert_eq!(
            service.get_room(room.id()).await.unwrap().inventory().count(),
            2
        );
    }
}

//! Hotel room types and the physical rooms drawn from their inventory.

use std::sync::Arc;

use common::{HotelRoomId, IdGenerator, RandomIdGenerator, RoomTypeId, UserId};
use domain::ports::{
    AccommodationRepository, AuthorizationPort, EventPublisher, HotelRoomFilter, Locked, Page,
    RepositoryError, RoomTypeFilter, RoomTypeRepository,
};
use domain::value_objects::Money;
use domain::{
    DomainResult, Entity, HotelRoom, HotelRoomStatus, LodgingPolicy, NewHotelRoom, NewRoomType,
    RoomType,
};

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::locking::bounded;
use crate::publishing::{drain, publish};

use super::{ensure_manager, load_parent};

/// Manages room types and enforces the hotel-room inventory cap.
///
/// Every change to a room type runs under its lock, so two creations against
/// the last free slot are serialized and the second sees the cap. The store
/// re-checks the cap at commit time for writers that skip the lock.
pub struct RoomTypeService<H, R, P, A>
where
    H: AccommodationRepository,
    R: RoomTypeRepository,
    P: EventPublisher,
    A: AuthorizationPort,
{
    accommodations: H,
    room_types: R,
    publisher: P,
    authorization: A,
    ids: Arc<dyn IdGenerator>,
    config: Config,
}

impl<H, R, P, A> RoomTypeService<H, R, P, A>
where
    H: AccommodationRepository,
    R: RoomTypeRepository,
    P: EventPublisher,
    A: AuthorizationPort,
{
    pub fn new(
        accommodations: H,
        room_types: R,
        publisher: P,
        authorization: A,
        config: Config,
    ) -> Self {
        Self {
            accommodations,
            room_types,
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

    /// Adds a room type to a hotel the actor manages.
    #[tracing::instrument(skip(self, props), fields(hotel_id = %props.hotel_id))]
    pub async fn create_room_type(
        &self,
        actor: UserId,
        props: NewRoomType,
    ) -> ServiceResult<RoomType> {
        let hotel = load_parent(&self.accommodations, props.hotel_id).await?;
        LodgingPolicy.ensure_can_add_room_type(&hotel)?;
        ensure_manager(&self.authorization, &hotel, actor).await?;

        let mut room_type = RoomType::create(props, self.ids.as_ref())?;
        self.room_types.save(&mut room_type).await?;
        let envelopes = drain(&mut room_type)?;
        publish(&self.publisher, envelopes).await?;

        tracing::info!(
            room_type_id = %room_type.id(),
            inventory = room_type.inventory().count(),
            "Created room type"
        );
        Ok(room_type)
    }

    /// Loads a room type with its hotel rooms.
    pub async fn get_room_type(&self, id: RoomTypeId) -> ServiceResult<RoomType> {
        self.room_types
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(RoomType::entity_type(), id))
    }

    pub async fn list_room_types(
        &self,
        page: Page,
        filter: RoomTypeFilter,
    ) -> ServiceResult<Vec<RoomType>> {
        Ok(self.room_types.find_many(page, filter).await?)
    }

    /// Draws one physical room from the room type's inventory.
    ///
    /// Fails with `InvalidOperation` once the inventory is exhausted and with
    /// `CapacityExceeded` if a concurrent writer got the last slot first.
    #[tracing::instrument(skip(self, props), fields(room_number = %props.room_number))]
    pub async fn create_hotel_room(
        &self,
        room_type_id: RoomTypeId,
        props: NewHotelRoom,
    ) -> ServiceResult<HotelRoom> {
        let mut room_type = self.lock(room_type_id).await?;

        let exhausted = room_type.remaining_capacity() == 0;
        let created = match room_type.create_hotel_room(props, self.ids.as_ref()) {
            Ok(room) => room,
            Err(err) => {
                if exhausted {
                    metrics::counter!("inventory_exhausted_total").increment(1);
                }
                return Err(err.into());
            }
        };

        if let Err(err) = self.room_types.save(&mut *room_type).await {
            if matches!(err, RepositoryError::CapacityExceeded { .. }) {
                metrics::counter!("inventory_exhausted_total").increment(1);
            }
            return Err(err.into());
        }
        let room = room_type.hotel_room(created.id())?.clone();
        let envelopes = drain(&mut *room_type)?;
        let remaining = room_type.remaining_capacity();
        drop(room_type);

        publish(&self.publisher, envelopes).await?;
        metrics::counter!("hotel_rooms_created_total").increment(1);
        tracing::info!(
            %room_type_id,
            hotel_room_id = %room.id(),
            remaining,
            "Created hotel room"
        );
        Ok(room)
    }

    /// Changes the number of sellable rooms. Never below the rooms already created.
    #[tracing::instrument(skip(self))]
    pub async fn adjust_inventory(&self, id: RoomTypeId, count: u32) -> ServiceResult<RoomType> {
        self.modify(id, |room_type| room_type.adjust_inventory(count))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_base_price(
        &self,
        id: RoomTypeId,
        price: Money,
    ) -> ServiceResult<RoomType> {
        self.modify(id, |room_type| {
            room_type.update_base_price(price);
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, id: RoomTypeId) -> ServiceResult<RoomType> {
        self.modify(id, |room_type| {
            room_type.activate();
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn deactivate(&self, id: RoomTypeId) -> ServiceResult<RoomType> {
        self.modify(id, |room_type| {
            room_type.deactivate();
            Ok(())
        })
        .await
    }

    pub async fn get_hotel_room(&self, id: HotelRoomId) -> ServiceResult<HotelRoom> {
        self.room_types
            .find_hotel_room_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(HotelRoom::entity_type(), id))
    }

    pub async fn list_hotel_rooms(
        &self,
        page: Page,
        filter: HotelRoomFilter,
    ) -> ServiceResult<Vec<HotelRoom>> {
        Ok(self.room_types.find_many_hotel_rooms(page, filter).await?)
    }

    /// Moves a hotel room to `status`.
    ///
    /// `AVAILABLE` is reached through release, which only an occupied or
    /// maintained room allows.
    #[tracing::instrument(skip(self))]
    pub async fn set_hotel_room_status(
        &self,
        id: HotelRoomId,
        status: HotelRoomStatus,
    ) -> ServiceResult<HotelRoom> {
        let lock = self.room_types.lock_hotel_room_by_id(id);
        let mut room =
            bounded(HotelRoom::entity_type(), id, self.config.lock_timeout, lock).await?;
        let from = room.status();

        match status {
            HotelRoomStatus::Available => HotelRoom::release(&mut room)?,
            HotelRoomStatus::Occupied => room.mark_occupied(),
            HotelRoomStatus::Clean => room.mark_clean(),
            HotelRoomStatus::Dirty => room.mark_dirty(),
            HotelRoomStatus::Maintenance => room.mark_maintenance(),
        }
        self.room_types.save_hotel_room(&mut *room).await?;

        tracing::debug!(hotel_room_id = %id, %from, to = %status, "Hotel room status changed");
        Ok(Locked::release(room))
    }

    async fn lock(&self, id: RoomTypeId) -> ServiceResult<Locked<RoomType>> {
        let lock = self.room_types.lock_by_id(id);
        bounded(RoomType::entity_type(), id, self.config.lock_timeout, lock).await
    }

    async fn modify(
        &self,
        id: RoomTypeId,
        apply: impl FnOnce(&mut RoomType) -> DomainResult<()> + Send,
    ) -> ServiceResult<RoomType> {
        let mut room_type = self.lock(id).await?;
        apply(&mut *room_type)?;
        self.room_types.save(&mut *room_type).await?;
        let envelopes = drain(&mut *room_type)?;
        let room_type = room_type.release();

        publish(&self.publisher, envelopes).await?;
        Ok(room_type)
    }
}

#[cfg(test)]
mod tests {
    use common::SequentialIdGenerator;
    use domain::{Accommodation, AccommodationType};
    use store::{InMemoryDirectory, InMemoryEventPublisher, InMemoryLodgingStore};

    use super::*;
    use crate::error::ErrorKind;
    use crate::fixtures::{new_accommodation, new_room_type, numbered};

    type Service = RoomTypeService<
        InMemoryLodgingStore,
        InMemoryLodgingStore,
        InMemoryEventPublisher,
        InMemoryDirectory,
    >;

    struct Harness {
        service: Service,
        store: InMemoryLodgingStore,
        publisher: InMemoryEventPublisher,
        owner: UserId,
    }

    impl Harness {
        fn new() -> Self {
            let store = InMemoryLodgingStore::new();
            let publisher = InMemoryEventPublisher::new();
            let service = RoomTypeService::new(
                store.clone(),
                store.clone(),
                publisher.clone(),
                InMemoryDirectory::new(),
                Config::default(),
            )
            .with_id_generator(Arc::new(SequentialIdGenerator::new()));
            Self {
                service,
                store,
                publisher,
                owner: UserId::new(),
            }
        }

        async fn accommodation(&self, accommodation_type: AccommodationType) -> Accommodation {
            let mut accommodation = Accommodation::create(
                new_accommodation(accommodation_type, self.owner),
                &RandomIdGenerator,
            )
            .unwrap();
            AccommodationRepository::save(&self.store, &mut accommodation)
                .await
                .unwrap();
            accommodation
        }

        async fn room_type(&self, inventory: u32) -> RoomType {
            let hotel = self.accommodation(AccommodationType::Hotel).await;
            self.service
                .create_room_type(self.owner, new_room_type(hotel.id(), inventory))
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn room_types_belong_to_hotels_only() {
        let h = Harness::new();
        let homestay = h.accommodation(AccommodationType::Homestay).await;

        let err = h
            .service
            .create_room_type(h.owner, new_room_type(homestay.id(), 2))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[tokio::test]
    async fn strangers_cannot_add_room_types() {
        let h = Harness::new();
        let hotel = h.accommodation(AccommodationType::Hotel).await;

        let err = h
            .service
            .create_room_type(UserId::new(), new_room_type(hotel.id(), 2))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn inventory_caps_hotel_rooms() {
        let h = Harness::new();
        let room_type = h.room_type(2).await;

        let first = h
            .service
            .create_hotel_room(room_type.id(), numbered("101"))
            .await
            .unwrap();
        assert_eq!(first.version().as_i64(), 1);
        h.service
            .create_hotel_room(room_type.id(), numbered("102"))
            .await
            .unwrap();

        let err = h
            .service
            .create_hotel_room(room_type.id(), numbered("103"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert_eq!(h.store.hotel_room_count(room_type.id()).await, 2);

        let stored = h.service.get_room_type(room_type.id()).await.unwrap();
        let numbers: Vec<String> = stored
            .hotel_rooms()
            .iter()
            .map(|room| room.room_number().to_string())
            .collect();
        assert_eq!(numbers, ["101", "102"]);
        assert_eq!(
            h.publisher.published_types(),
            ["RoomTypeCreated", "HotelRoomCreated", "HotelRoomCreated"]
        );
    }

    #[tokio::test]
    async fn inventory_cannot_drop_below_created_rooms() {
        let h = Harness::new();
        let room_type = h.room_type(3).await;
        for number in ["201", "202"] {
            h.service
                .create_hotel_room(room_type.id(), numbered(number))
                .await
                .unwrap();
        }

        let err = h.service.adjust_inventory(room_type.id(), 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);

        let grown = h.service.adjust_inventory(room_type.id(), 5).await.unwrap();
        assert_eq!(grown.inventory().count(), 5);
        assert_eq!(grown.remaining_capacity(), 3);
    }

    #[tokio::test]
    async fn hotel_room_status_follows_housekeeping() {
        let h = Harness::new();
        let room_type = h.room_type(1).await;
        let room = h
            .service
            .create_hotel_room(room_type.id(), numbered("301"))
            .await
            .unwrap();

        let err = h
            .service
            .set_hotel_room_status(room.id(), HotelRoomStatus::Available)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        h.service
            .set_hotel_room_status(room.id(), HotelRoomStatus::Occupied)
            .await
            .unwrap();
        let released = h
            .service
            .set_hotel_room_status(room.id(), HotelRoomStatus::Available)
            .await
            .unwrap();
        assert_eq!(released.status(), HotelRoomStatus::Available);
        assert_eq!(
            h.service.get_hotel_room(room.id()).await.unwrap().status(),
            HotelRoomStatus::Available
        );
    }

    #[tokio::test]
    async fn housekeeping_and_room_type_writers_do_not_conflict() {
        let h = Harness::new();
        let room_type = h.room_type(3).await;
        let room = h
            .service
            .create_hotel_room(room_type.id(), numbered("101"))
            .await
            .unwrap();

        let mut pricing = RoomTypeRepository::lock_by_id(&h.store, room_type.id())
            .await
            .unwrap();
        h.service
            .set_hotel_room_status(room.id(), HotelRoomStatus::Occupied)
            .await
            .unwrap();
        pricing.update_base_price(Money::new(99.0, "USD").unwrap());
        RoomTypeRepository::save(&h.store, &mut pricing).await.unwrap();
        assert_eq!(
            pricing.hotel_room(room.id()).unwrap().status(),
            HotelRoomStatus::Occupied
        );
        drop(pricing);

        let mut cleaning = h.store.lock_hotel_room_by_id(room.id()).await.unwrap();
        h.service
            .create_hotel_room(room_type.id(), numbered("102"))
            .await
            .unwrap();
        cleaning.mark_clean();
        h.store.save_hotel_room(&mut cleaning).await.unwrap();
        drop(cleaning);

        let stored = h.service.get_hotel_room(room.id()).await.unwrap();
        assert_eq!(stored.status(), HotelRoomStatus::Clean);
        assert_eq!(stored.version().as_i64(), 3);
        assert_eq!(h.store.hotel_room_count(room_type.id()).await, 2);
    }

    #[tokio::test]
    async fn missing_room_type_is_not_found() {
        let h = Harness::new();
        let err = h
            .service
            .create_hotel_room(RoomTypeId::new(), numbered("1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

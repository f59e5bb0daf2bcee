//! End-to-end tests driving the services against the in-memory adapters.

use std::sync::Arc;

use common::{SequentialIdGenerator, UserId};
use domain::ports::{HotelRoomFilter, Page};
use domain::value_objects::{
    Address, Amenities, BedType, CancellationPolicy, CancellationPolicyType, GuestCapacity,
    Location, Money, Policies, RoomCategory, RoomImage, RoomInventory, RoomNumber,
};
use domain::{
    AccommodationStatus, AccommodationType, Entity, FloorType, HotelRoomStatus, NewAccommodation,
    NewFloor, NewHotelRoom, NewRoom, NewRoomType, RoomProfile, RoomStatus,
};
use futures_util::future::join_all;
use orchestration::{
    AccommodationService, Config, ErrorKind, FloorService, RoomService, RoomTypeService,
    ServiceError,
};
use store::{
    InMemoryBookingCalendar, InMemoryDirectory, InMemoryEventPublisher, InMemoryLodgingStore,
};

type Store = InMemoryLodgingStore;
type Publisher = InMemoryEventPublisher;

struct TestHarness {
    accommodations:
        AccommodationService<Store, Publisher, InMemoryDirectory, InMemoryBookingCalendar>,
    room_types: Arc<RoomTypeService<Store, Store, Publisher, InMemoryDirectory>>,
    rooms: RoomService<Store, Store, Publisher, InMemoryDirectory>,
    floors: FloorService<Store, Store, InMemoryDirectory>,
    publisher: Publisher,
    calendar: InMemoryBookingCalendar,
    admin: UserId,
    owner: UserId,
}

impl TestHarness {
    fn new(config: Config) -> Self {
        let store = InMemoryLodgingStore::new();
        let publisher = InMemoryEventPublisher::new();
        let directory = InMemoryDirectory::new();
        let calendar = InMemoryBookingCalendar::new();
        let admin = UserId::new();
        directory.grant_super_admin(admin);
        let ids = Arc::new(SequentialIdGenerator::new());

        Self {
            accommodations: AccommodationService::new(
                store.clone(),
                publisher.clone(),
                directory.clone(),
                calendar.clone(),
                config.clone(),
            )
            .with_id_generator(ids.clone()),
            room_types: Arc::new(
                RoomTypeService::new(
                    store.clone(),
                    store.clone(),
                    publisher.clone(),
                    directory.clone(),
                    config.clone(),
                )
                .with_id_generator(ids.clone()),
            ),
            rooms: RoomService::new(
                store.clone(),
                store.clone(),
                publisher.clone(),
                directory.clone(),
                config,
            )
            .with_id_generator(ids.clone()),
            floors: FloorService::new(store.clone(), store, directory).with_id_generator(ids),
            publisher,
            calendar,
            admin,
            owner: UserId::new(),
        }
    }

    fn accommodation(&self, accommodation_type: AccommodationType) -> NewAccommodation {
        let images = *accommodation_type.image_bounds().start();
        NewAccommodation {
            accommodation_type,
            name: "Saigon Corner".to_string(),
            owner_id: self.owner,
            address: Address::new("88 Dong Khoi", "Ben Nghe", "District 1", "HCMC", "VN")
                .unwrap(),
            location: Location::new(10.776, 106.703).unwrap(),
            description: String::new(),
            images: (0..images)
                .map(|i| format!("https://img.example/h{i}.jpg"))
                .collect(),
            amenities: Amenities::new(["wifi", "pool"]).unwrap(),
            policies: Policies::new("15:00", "11:00").unwrap(),
            cancellation_policy: CancellationPolicy::new(CancellationPolicyType::Flexible, 1, 100)
                .unwrap(),
            hotel_details: None,
        }
    }
}

fn profile(name: &str) -> RoomProfile {
    RoomProfile::new(
        name,
        RoomCategory::Standard,
        22.5,
        GuestCapacity::new(2, 0).unwrap(),
        1,
        BedType::Queen,
    )
    .unwrap()
}

fn room_images(count: usize) -> Vec<RoomImage> {
    (0..count)
        .map(|i| RoomImage::new(format!("https://img.example/p{i}.jpg"), i as u32).unwrap())
        .collect()
}

fn room_type(hotel_id: common::AccommodationId, inventory: u32) -> NewRoomType {
    NewRoomType {
        hotel_id,
        profile: profile("Standard Queen"),
        description: "City side".to_string(),
        amenities: Amenities::new(["air conditioning"]).unwrap(),
        images: room_images(4),
        inventory: RoomInventory::new(inventory).unwrap(),
        base_price: Money::new(1_200_000.0, "VND").unwrap(),
        view_direction: None,
    }
}

fn numbered(value: &str) -> NewHotelRoom {
    NewHotelRoom::numbered(RoomNumber::new(value).unwrap())
}

#[tokio::test]
async fn hotel_from_registration_to_full_inventory() {
    let h = TestHarness::new(Config::default());
    let hotel = h
        .accommodations
        .register(h.accommodation(AccommodationType::Hotel))
        .await
        .unwrap();
    h.accommodations.approve(hotel.id(), h.admin).await.unwrap();
    let active = h.accommodations.activate(hotel.id(), h.owner).await.unwrap();
    assert_eq!(active.status(), AccommodationStatus::Active);

    let floor = h
        .floors
        .add_floor(
            h.owner,
            NewFloor {
                accommodation_id: hotel.id(),
                floor_number: 2,
                name: "Second".to_string(),
                floor_type: FloorType::Room,
                description: String::new(),
                amenities: Amenities::empty(),
            },
        )
        .await
        .unwrap();

    let standard = h
        .room_types
        .create_room_type(h.owner, room_type(hotel.id(), 3))
        .await
        .unwrap();
    for number in ["201", "202", "203"] {
        let props = NewHotelRoom {
            floor_id: Some(floor.id()),
            ..numbered(number)
        };
        h.room_types
            .create_hotel_room(standard.id(), props)
            .await
            .unwrap();
    }

    let err = h
        .room_types
        .create_hotel_room(standard.id(), numbered("204"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);

    let on_floor = h
        .room_types
        .list_hotel_rooms(
            Page::default(),
            HotelRoomFilter {
                floor_id: Some(floor.id()),
                ..HotelRoomFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(on_floor.len(), 3);
    assert!(on_floor
        .iter()
        .all(|room| room.status() == HotelRoomStatus::Available));

    assert_eq!(
        h.publisher.published_types(),
        [
            "AccommodationCreated",
            "AccommodationApproved",
            "AccommodationActivated",
            "RoomTypeCreated",
            "HotelRoomCreated",
            "HotelRoomCreated",
            "HotelRoomCreated",
        ]
    );
}

#[tokio::test]
async fn homestay_room_drawn_down_then_retired() {
    let config = Config {
        booking_horizon_days: 7,
        ..Config::default()
    };
    let h = TestHarness::new(config);
    let homestay = h
        .accommodations
        .register(h.accommodation(AccommodationType::Homestay))
        .await
        .unwrap();
    h.accommodations.approve(homestay.id(), h.admin).await.unwrap();
    h.accommodations.activate(homestay.id(), h.owner).await.unwrap();

    let room = h
        .rooms
        .create_room(
            h.owner,
            NewRoom {
                accommodation_id: homestay.id(),
                profile: profile("Attic"),
                description: String::new(),
                amenities: Amenities::empty(),
                images: room_images(2),
                inventory: RoomInventory::new(3).unwrap(),
            },
        )
        .await
        .unwrap();
    h.rooms.decrease_inventory(room.id(), 2).await.unwrap();
    let retired = h.rooms.deactivate(room.id()).await.unwrap();
    assert_eq!(retired.status(), RoomStatus::Inactive);

    h.accommodations.suspend(homestay.id(), h.admin).await.unwrap();
    h.calendar.add_booking(homestay.id(), 10);
    h.accommodations
        .delete(homestay.id(), h.owner, false)
        .await
        .unwrap();

    let err = h.accommodations.get(homestay.id()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creations_never_exceed_inventory() {
    let h = TestHarness::new(Config::default());
    let hotel = h
        .accommodations
        .register(h.accommodation(AccommodationType::Hotel))
        .await
        .unwrap();
    let single = h
        .room_types
        .create_room_type(h.owner, room_type(hotel.id(), 1))
        .await
        .unwrap();

    let attempts = ["501", "502"].map(|number| {
        let service = Arc::clone(&h.room_types);
        let room_type_id = single.id();
        tokio::spawn(async move { service.create_hotel_room(room_type_id, numbered(number)).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(loser.kind(), ErrorKind::InvalidOperation);

    let stored = h.room_types.get_room_type(single.id()).await.unwrap();
    assert_eq!(stored.hotel_rooms().len(), 1);
    assert_eq!(stored.remaining_capacity(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_writers_fill_inventory_exactly() {
    let h = TestHarness::new(Config::default());
    let hotel = h
        .accommodations
        .register(h.accommodation(AccommodationType::Hotel))
        .await
        .unwrap();
    let suite = h
        .room_types
        .create_room_type(h.owner, room_type(hotel.id(), 5))
        .await
        .unwrap();

    let attempts: Vec<_> = (0..20)
        .map(|n| {
            let service = Arc::clone(&h.room_types);
            let room_type_id = suite.id();
            tokio::spawn(async move {
                service
                    .create_hotel_room(room_type_id, numbered(&format!("9{n:02}")))
                    .await
            })
        })
        .collect();
    let created = join_all(attempts)
        .await
        .into_iter()
        .filter(|joined| matches!(joined, Ok(Ok(_))))
        .count();

    assert_eq!(created, 5);
    let stored = h.room_types.get_room_type(suite.id()).await.unwrap();
    assert_eq!(stored.hotel_rooms().len(), 5);
    assert_eq!(
        h.publisher
            .published_types()
            .iter()
            .filter(|t| *t == "HotelRoomCreated")
            .count(),
        5
    );
}

//! Builders shared by the service unit tests.

use common::{AccommodationId, UserId};
use domain::value_objects::{
    Address, Amenities, BedType, CancellationPolicy, CancellationPolicyType, GuestCapacity,
    Location, Money, Policies, RoomCategory, RoomImage, RoomInventory, RoomNumber,
};
use domain::{
    AccommodationType, FloorType, NewAccommodation, NewFloor, NewHotelRoom, NewRoom, NewRoomType,
    RoomProfile,
};

pub(crate) fn new_accommodation(
    accommodation_type: AccommodationType,
    owner_id: UserId,
) -> NewAccommodation {
    let image_count = *accommodation_type.image_bounds().start();
    NewAccommodation {
        accommodation_type,
        name: "Lotus Garden".to_string(),
        owner_id,
        address: Address::new("5 Hang Bac", "Hang Bac", "Hoan Kiem", "Hanoi", "VN").unwrap(),
        location: Location::new(21.03, 105.85).unwrap(),
        description: String::new(),
        images: (0..image_count)
            .map(|i| format!("https://img.example/a{i}.jpg"))
            .collect(),
        amenities: Amenities::new(["wifi"]).unwrap(),
        policies: Policies::new("14:00", "12:00").unwrap(),
        cancellation_policy: CancellationPolicy::new(CancellationPolicyType::Moderate, 3, 50)
            .unwrap(),
        hotel_details: None,
    }
}

fn profile(name: &str) -> RoomProfile {
    RoomProfile::new(
        name,
        RoomCategory::Deluxe,
        32.0,
        GuestCapacity::new(2, 2).unwrap(),
        2,
        BedType::Twin,
    )
    .unwrap()
}

fn room_images(count: usize) -> Vec<RoomImage> {
    (0..count)
        .map(|i| RoomImage::new(format!("https://img.example/r{i}.jpg"), i as u32).unwrap())
        .collect()
}

pub(crate) fn new_room_type(hotel_id: AccommodationId, inventory: u32) -> NewRoomType {
    NewRoomType {
        hotel_id,
        profile: profile("Deluxe Twin"),
        description: String::new(),
        amenities: Amenities::empty(),
        images: room_images(3),
        inventory: RoomInventory::new(inventory).unwrap(),
        base_price: Money::new(95.0, "USD").unwrap(),
        view_direction: None,
    }
}

pub(crate) fn new_room(accommodation_id: AccommodationId, inventory: u32) -> NewRoom {
    NewRoom {
        accommodation_id,
        profile: profile("Garden Room"),
        description: "Opens onto the courtyard".to_string(),
        amenities: Amenities::empty(),
        images: room_images(2),
        inventory: RoomInventory::new(inventory).unwrap(),
    }
}

pub(crate) fn new_floor(accommodation_id: AccommodationId, floor_number: u32) -> NewFloor {
    NewFloor {
        accommodation_id,
        floor_number,
        name: format!("Floor {floor_number}"),
        floor_type: FloorType::Room,
        description: String::new(),
        amenities: Amenities::empty(),
    }
}

pub(crate) fn numbered(value: &str) -> NewHotelRoom {
    NewHotelRoom::numbered(RoomNumber::new(value).unwrap())
}

//! Hotel room types and the physical rooms they own.

mod aggregate;
mod events;
mod hotel_room;

pub use aggregate::{MIN_ROOM_TYPE_IMAGES, NewRoomType, RoomType};
pub use events::{
    HotelRoomCreatedData, RoomTypeCreatedData, RoomTypeEvent, RoomTypeInventoryAdjustedData,
};
pub use hotel_room::{HotelRoom, HotelRoomStatus, NewHotelRoom};

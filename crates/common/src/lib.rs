//! Shared types for the lodging inventory workspace.

mod id_generator;
mod types;

pub use id_generator::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use types::{
    AccommodationId, FloorId, HotelRoomId, RoomId, RoomTypeId, UserId, Version,
};

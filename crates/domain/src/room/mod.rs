//! Homestay rooms.
//!
//! A [`Room`] has no children: its inventory counts fungible units directly.
//! [`RoomProfile`] and [`RoomStatus`] are shared with hotel room types.

mod aggregate;
mod events;
mod profile;

pub use aggregate::{NewRoom, ROOM_IMAGES_ON_CREATE, Room};
pub use events::{RoomCreatedData, RoomEvent, RoomInventoryAdjustedData};
pub use profile::{RoomProfile, RoomStatus};

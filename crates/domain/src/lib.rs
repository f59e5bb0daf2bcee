//! Domain layer for the lodging inventory.
//!
//! This crate provides:
//! - Entity, AggregateRoot and DomainEvent traits with an embedded event recorder
//! - Self-validating value objects
//! - Accommodation, Floor, Room, RoomType and HotelRoom with their state machines
//! - LodgingPolicy for rules spanning an accommodation and its resources
//! - Repository, policy and publisher ports implemented by adapters

#[macro_use]
mod macros;

pub mod accommodation;
pub mod aggregate;
pub mod error;
pub mod event;
pub mod floor;
pub mod policy;
pub mod ports;
pub mod room;
pub mod room_type;
pub mod value_objects;

pub use accommodation::{
    Accommodation, AccommodationEvent, AccommodationStatus, AccommodationType,
    AccommodationUpdate, HotelDetails, NewAccommodation,
};
pub use aggregate::{AggregateRoot, DomainEvent, Entity, EventRecorder};
pub use error::{DomainError, DomainResult, ErrorKind};
pub use event::{EventEnvelope, EventId};
pub use floor::{Floor, FloorStatus, FloorType, NewFloor};
pub use policy::LodgingPolicy;
pub use room::{NewRoom, Room, RoomEvent, RoomProfile, RoomStatus};
pub use room_type::{
    HotelRoom, HotelRoomStatus, NewHotelRoom, NewRoomType, RoomType, RoomTypeEvent,
};

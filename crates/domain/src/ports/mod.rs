//! Interfaces the domain expects from the outside world.
//!
//! Repositories persist aggregates, policy ports answer questions owned by
//! other bounded contexts, and the publisher ships recorded events.

mod policy;
mod publisher;
mod repository;

pub use policy::{AuthorizationPort, BookingPolicyPort, PortError};
pub use publisher::EventPublisher;
pub use repository::{
    AccommodationRepository, FloorRepository, HotelRoomFilter, LockLease, Locked, Page,
    RepositoryError, RepositoryResult, RoomFilter, RoomRepository, RoomTypeFilter,
    RoomTypeRepository,
};

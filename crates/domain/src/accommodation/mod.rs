//! Accommodation aggregate: a homestay or hotel owned by a host.
//!
//! An accommodation is created PENDING, reviewed by an administrator and then
//! operated (activated, suspended). Its children (floors, rooms, room types)
//! are separate aggregates that reference it by id.

mod aggregate;
mod details;
mod events;
mod state;

pub use aggregate::{Accommodation, AccommodationUpdate, NewAccommodation};
pub use details::HotelDetails;
pub use events::{
    AccommodationApprovedData, AccommodationCreatedData, AccommodationEvent,
    AccommodationRejectedData, AccommodationStatusChangedData,
};
pub use state::{AccommodationStatus, AccommodationType};

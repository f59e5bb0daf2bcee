//! Immutable, self-validating value types.
//!
//! Every constructor validates eagerly, and deserialization goes through the
//! same constructor, so aggregates only check cross-field and state rules.

mod address;
mod amenities;
mod capacity;
mod catalog;
mod contact;
mod inventory;
mod location;
mod money;
mod policies;
mod room_image;
mod room_number;

pub use address::Address;
pub use amenities::Amenities;
pub use capacity::GuestCapacity;
pub use catalog::{BedType, CancellationPolicyType, ImageType, RoomCategory, ViewDirection};
pub use contact::ContactInfo;
pub use inventory::RoomInventory;
pub use location::Location;
pub use money::Money;
pub use policies::{CancellationPolicy, Policies};
pub use room_image::RoomImage;
pub use room_number::{MAX_ROOM_NUMBER_LEN, RoomNumber};

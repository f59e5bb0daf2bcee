use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::IdGenerator;

/// Declares a UUID-backed identifier newtype.
///
/// Each identifier is a distinct type so a `RoomId` can never be passed where
/// a `RoomTypeId` is expected, even though both wrap a UUID.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Draws the next identifier from an injected generator.
            pub fn generate(ids: &dyn IdGenerator) -> Self {
                Self(ids.next_uuid())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Identifier of an accommodation (homestay or hotel).
    AccommodationId
);

uuid_id!(
    /// Identifier of a floor inside a hotel.
    FloorId
);

uuid_id!(
    /// Identifier of a homestay room listing.
    RoomId
);

uuid_id!(
    /// Identifier of a hotel room type.
    RoomTypeId
);

uuid_id!(
    /// Identifier of a physical hotel room.
    HotelRoomId
);

uuid_id!(
    /// Identifier of a user acting on the inventory (owner, reviewer, admin).
    UserId
);

/// Persistence version of an entity, used for optimistic concurrency control.
///
/// Version 0 means the entity has never been persisted. Every successful save
/// increments it by one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the version of an entity that was never persisted.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version assigned by the first save.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns true if the entity was never persisted.
    pub fn is_initial(&self) -> bool {
        self.0 == 0
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

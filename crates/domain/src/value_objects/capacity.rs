use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Maximum number of guests a room sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CapacityParts")]
pub struct GuestCapacity {
    max_adults: u32,
    max_children: u32,
}

#[derive(Deserialize)]
struct CapacityParts {
    max_adults: u32,
    max_children: u32,
}

impl TryFrom<CapacityParts> for GuestCapacity {
    type Error = DomainError;

    fn try_from(parts: CapacityParts) -> Result<Self, Self::Error> {
        GuestCapacity::new(parts.max_adults, parts.max_children)
    }
}

impl GuestCapacity {
    pub fn new(max_adults: u32, max_children: u32) -> DomainResult<Self> {
        if max_adults < 1 {
            return Err(DomainError::invalid_input(
                "capacity.max_adults",
                "at least one adult is required",
            ));
        }
        Ok(Self {
            max_adults,
            max_children,
        })
    }

    pub fn max_adults(&self) -> u32 {
        self.max_adults
    }

    pub fn max_children(&self) -> u32 {
        self.max_children
    }

    /// Total number of guests, adults and children combined.
    pub fn total(&self) -> u32 {
        self.max_adults + self.max_children
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Number of identical sellable units. Never below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RoomInventory(u32);

impl TryFrom<u32> for RoomInventory {
    type Error = DomainError;

    fn try_from(count: u32) -> Result<Self, Self::Error> {
        RoomInventory::new(count)
    }
}

impl From<RoomInventory> for u32 {
    fn from(inventory: RoomInventory) -> Self {
        inventory.0
    }
}

impl RoomInventory {
    pub fn new(count: u32) -> DomainResult<Self> {
        if count < 1 {
            return Err(DomainError::invalid_input(
                "inventory",
                "must be at least 1",
            ));
        }
        Ok(Self(count))
    }

    pub fn count(&self) -> u32 {
        self.0
    }

    /// Returns a new inventory `by` units larger.
    pub fn increase(&self, by: u32) -> DomainResult<Self> {
        let count = self
            .0
            .checked_add(by)
            .ok_or_else(|| DomainError::invalid_input("inventory", "count overflow"))?;
        Self::new(count)
    }

    /// Returns a new inventory `by` units smaller; the result must stay at least 1.
    pub fn decrease(&self, by: u32) -> DomainResult<Self> {
        let count = self.0.saturating_sub(by);
        Self::new(count).map_err(|_| {
            DomainError::invalid_input(
                "inventory",
                format!("cannot decrease {} by {by}: must stay at least 1", self.0),
            )
        })
    }
}

impl std::fmt::Display for RoomInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

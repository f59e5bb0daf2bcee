use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, require_text};
use crate::value_objects::{BedType, GuestCapacity, RoomCategory};

labelled_enum! {
    /// Whether a room or room type is offered for sale.
    pub enum RoomStatus ("status") {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    }
}

/// Physical description shared by homestay rooms and hotel room types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileParts")]
pub struct RoomProfile {
    name: String,
    category: RoomCategory,
    /// Floor area in square metres.
    area: f64,
    capacity: GuestCapacity,
    bed_count: u32,
    bed_type: BedType,
}

#[derive(Deserialize)]
struct ProfileParts {
    name: String,
    category: RoomCategory,
    area: f64,
    capacity: GuestCapacity,
    bed_count: u32,
    bed_type: BedType,
}

impl TryFrom<ProfileParts> for RoomProfile {
    type Error = DomainError;

    fn try_from(parts: ProfileParts) -> Result<Self, Self::Error> {
        RoomProfile::new(
            parts.name,
            parts.category,
            parts.area,
            parts.capacity,
            parts.bed_count,
            parts.bed_type,
        )
    }
}

impl RoomProfile {
    pub fn new(
        name: impl AsRef<str>,
        category: RoomCategory,
        area: f64,
        capacity: GuestCapacity,
        bed_count: u32,
        bed_type: BedType,
    ) -> DomainResult<Self> {
        let name = require_text("name", name)?;
        if !area.is_finite() || area <= 0.0 {
            return Err(DomainError::invalid_input(
                "area",
                format!("{area} must be a positive number"),
            ));
        }
        if bed_count < 1 {
            return Err(DomainError::invalid_input("bed_count", "must be at least 1"));
        }
        Ok(Self {
            name,
            category,
            area,
            capacity,
            bed_count,
            bed_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> RoomCategory {
        self.category
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn capacity(&self) -> GuestCapacity {
        self.capacity
    }

    pub fn bed_count(&self) -> u32 {
        self.bed_count
    }

    pub fn bed_type(&self) -> BedType {
        self.bed_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity() -> GuestCapacity {
        GuestCapacity::new(2, 1).unwrap()
    }

    #[test]
    fn area_must_be_positive_and_finite() {
        for area in [0.0, -4.0, f64::NAN, f64::INFINITY] {
            let err = RoomProfile::new(
                "Garden",
                RoomCategory::Standard,
                area,
                capacity(),
                1,
                BedType::Double,
            )
            .unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput { field: "area", .. }));
        }
    }

    #[test]
    fn needs_a_bed() {
        let err = RoomProfile::new(
            "Garden",
            RoomCategory::Standard,
            18.5,
            capacity(),
            0,
            BedType::Double,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput { field: "bed_count", .. }));
    }

    #[test]
    fn deserialization_revalidates() {
        let json = serde_json::json!({
            "name": "Garden",
            "category": "STANDARD",
            "area": -1.0,
            "capacity": {"max_adults": 2, "max_children": 0},
            "bed_count": 1,
            "bed_type": "DOUBLE"
        });
        assert!(serde_json::from_value::<RoomProfile>(json).is_err());
    }
}

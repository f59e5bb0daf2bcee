use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_objects::ContactInfo;

/// Attributes that only make sense for hotels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HotelDetailsParts")]
pub struct HotelDetails {
    star_rating: Option<u8>,
    floor_count: Option<u32>,
    room_count: Option<u32>,
    contact: Option<ContactInfo>,
}

#[derive(Deserialize)]
struct HotelDetailsParts {
    star_rating: Option<u8>,
    floor_count: Option<u32>,
    room_count: Option<u32>,
    contact: Option<ContactInfo>,
}

impl TryFrom<HotelDetailsParts> for HotelDetails {
    type Error = DomainError;

    fn try_from(parts: HotelDetailsParts) -> Result<Self, Self::Error> {
        let details = HotelDetails {
            star_rating: parts.star_rating.map(validate_star_rating).transpose()?,
            floor_count: parts.floor_count,
            room_count: parts.room_count,
            contact: parts.contact,
        };
        Ok(details)
    }
}

impl HotelDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_star_rating(mut self, stars: u8) -> DomainResult<Self> {
        self.star_rating = Some(validate_star_rating(stars)?);
        Ok(self)
    }

    pub fn with_floor_count(mut self, floors: u32) -> Self {
        self.floor_count = Some(floors);
        self
    }

    pub fn with_room_count(mut self, rooms: u32) -> Self {
        self.room_count = Some(rooms);
        self
    }

    pub fn with_contact(mut self, contact: ContactInfo) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn star_rating(&self) -> Option<u8> {
        self.star_rating
    }

    pub fn floor_count(&self) -> Option<u32> {
        self.floor_count
    }

    pub fn room_count(&self) -> Option<u32> {
        self.room_count
    }

    pub fn contact(&self) -> Option<&ContactInfo> {
        self.contact.as_ref()
    }
}

pub(crate) fn validate_star_rating(stars: u8) -> DomainResult<u8> {
    if !(1..=5).contains(&stars) {
        return Err(DomainError::invalid_input(
            "star_rating",
            format!("{stars} is outside [1, 5]"),
        ));
    }
    Ok(stars)
}

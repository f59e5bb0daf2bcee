use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Coordinates")]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<Coordinates> for Location {
    type Error = DomainError;

    fn try_from(c: Coordinates) -> Result<Self, Self::Error> {
        Location::new(c.latitude, c.longitude)
    }
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> DomainResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::invalid_input(
                "location.latitude",
                format!("{latitude} is outside [-90, 90]"),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::invalid_input(
                "location.longitude",
                format!("{longitude} is outside [-180, 180]"),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

//! Floors of a hotel.
//!
//! A floor references its accommodation by id only. Whether the accommodation
//! may have floors at all is decided by [`crate::LodgingPolicy`] before
//! [`Floor::create`] is called.

use chrono::{DateTime, Utc};
use common::{AccommodationId, FloorId, IdGenerator, Version};
use serde::{Deserialize, Serialize};

use crate::aggregate::Entity;
use crate::error::{DomainResult, require_text};
use crate::value_objects::Amenities;

labelled_enum! {
    /// What a floor is used for.
    pub enum FloorType ("floor_type") {
        Room => "ROOM",
        Service => "SERVICE",
        Lobby => "LOBBY",
        Parking => "PARKING",
    }
}

labelled_enum! {
    /// Operating status of a floor. Any status may follow any other.
    pub enum FloorStatus ("status") {
        Active => "ACTIVE",
        Maintenance => "MAINTENANCE",
        Closed => "CLOSED",
    }
}

#[derive(Debug, Clone)]
pub struct NewFloor {
    pub accommodation_id: AccommodationId,
    pub floor_number: u32,
    pub name: String,
    pub floor_type: FloorType,
    pub description: String,
    pub amenities: Amenities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    id: FloorId,
    #[serde(default)]
    version: Version,
    accommodation_id: AccommodationId,
    floor_number: u32,
    name: String,
    floor_type: FloorType,
    status: FloorStatus,
    description: String,
    amenities: Amenities,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Entity for Floor {
    type Id = FloorId;

    fn entity_type() -> &'static str {
        "floor"
    }

    fn id(&self) -> FloorId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn check_invariants(&self) -> DomainResult<()> {
        require_text("name", &self.name).map(|_| ())
    }
}

impl Floor {
    /// Creates an ACTIVE floor.
    pub fn create(props: NewFloor, ids: &dyn IdGenerator) -> DomainResult<Self> {
        let name = require_text("name", &props.name)?;
        let now = Utc::now();
        Ok(Self {
            id: FloorId::generate(ids),
            version: Version::initial(),
            accommodation_id: props.accommodation_id,
            floor_number: props.floor_number,
            name,
            floor_type: props.floor_type,
            status: FloorStatus::Active,
            description: props.description.trim().to_string(),
            amenities: props.amenities,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn accommodation_id(&self) -> AccommodationId {
        self.accommodation_id
    }

    pub fn floor_number(&self) -> u32 {
        self.floor_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn floor_type(&self) -> FloorType {
        self.floor_type
    }

    pub fn status(&self) -> FloorStatus {
        self.status
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amenities(&self) -> &Amenities {
        &self.amenities
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True while the floor is under maintenance or closed.
    pub fn is_blocked(&self) -> bool {
        matches!(self.status, FloorStatus::Maintenance | FloorStatus::Closed)
    }

    pub fn update_name(&mut self, name: impl AsRef<str>) -> DomainResult<()> {
        self.name = require_text("name", name)?;
        self.touch();
        Ok(())
    }

    pub fn update_description(&mut self, description: impl AsRef<str>) {
        self.description = description.as_ref().trim().to_string();
        self.touch();
    }

    pub fn update_amenities(&mut self, amenities: Amenities) {
        self.amenities = amenities;
        self.touch();
    }

    pub fn block_for_maintenance(&mut self) {
        self.set_status(FloorStatus::Maintenance);
    }

    pub fn close(&mut self) {
        self.set_status(FloorStatus::Closed);
    }

    pub fn activate(&mut self) {
        self.set_status(FloorStatus::Active);
    }

    fn set_status(&mut self, status: FloorStatus) {
        if self.status != status {
            self.status = status;
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

//! Accommodation aggregate implementation.

use chrono::{DateTime, Utc};
use common::{AccommodationId, IdGenerator, UserId, Version};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, Entity, EventRecorder};
use crate::error::{DomainError, DomainResult, require_text};
use crate::value_objects::{Address, Amenities, CancellationPolicy, Location, Policies};

use super::details::validate_star_rating;
use super::{AccommodationEvent, AccommodationStatus, AccommodationType, HotelDetails};

const ENTITY: &str = "accommodation";

/// Everything needed to register a new accommodation.
#[derive(Debug, Clone)]
pub struct NewAccommodation {
    pub accommodation_type: AccommodationType,
    pub name: String,
    pub owner_id: UserId,
    pub address: Address,
    pub location: Location,
    pub description: String,
    pub images: Vec<String>,
    pub amenities: Amenities,
    pub policies: Policies,
    pub cancellation_policy: CancellationPolicy,
    pub hotel_details: Option<HotelDetails>,
}

/// Partial update; `None` leaves the attribute untouched.
#[derive(Debug, Clone, Default)]
pub struct AccommodationUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Amenities>,
    pub address: Option<Address>,
    pub location: Option<Location>,
    pub policies: Option<Policies>,
    pub cancellation_policy: Option<CancellationPolicy>,
    pub star_rating: Option<u8>,
}

impl AccommodationUpdate {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.images.is_none()
            && self.amenities.is_none()
            && self.address.is_none()
            && self.location.is_none()
            && self.policies.is_none()
            && self.cancellation_policy.is_none()
            && self.star_rating.is_none()
    }
}

/// Accommodation aggregate root.
///
/// A homestay or hotel with its review workflow, physical attributes and house
/// policies. Status only moves through the methods below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accommodation {
    id: AccommodationId,

    /// Version for optimistic concurrency.
    #[serde(default)]
    version: Version,

    #[serde(rename = "type")]
    accommodation_type: AccommodationType,
    name: String,
    status: AccommodationStatus,
    owner_id: UserId,
    address: Address,
    location: Location,
    description: String,
    images: Vec<String>,
    amenities: Amenities,
    policies: Policies,
    cancellation_policy: CancellationPolicy,
    approved_by: Option<UserId>,
    approved_at: Option<DateTime<Utc>>,
    hotel_details: Option<HotelDetails>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    #[serde(skip)]
    events: EventRecorder<AccommodationEvent>,
}

impl Entity for Accommodation {
    type Id = AccommodationId;

    fn entity_type() -> &'static str {
        ENTITY
    }

    fn id(&self) -> AccommodationId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn check_invariants(&self) -> DomainResult<()> {
        validate_images(self.accommodation_type, &self.images)?;
        validate_hotel_details(self.accommodation_type, self.hotel_details.as_ref())?;
        require_text("name", &self.name)?;
        Ok(())
    }
}

impl AggregateRoot for Accommodation {
    type Event = AccommodationEvent;

    fn pull_domain_events(&mut self) -> Vec<AccommodationEvent> {
        self.events.pull()
    }

    fn pending_events(&self) -> &[AccommodationEvent] {
        self.events.pending()
    }
}

// Query methods
impl Accommodation {
    pub fn accommodation_type(&self) -> AccommodationType {
        self.accommodation_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> AccommodationStatus {
        self.status
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn amenities(&self) -> &Amenities {
        &self.amenities
    }

    pub fn policies(&self) -> &Policies {
        &self.policies
    }

    pub fn cancellation_policy(&self) -> CancellationPolicy {
        self.cancellation_policy
    }

    pub fn approved_by(&self) -> Option<UserId> {
        self.approved_by
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn hotel_details(&self) -> Option<&HotelDetails> {
        self.hotel_details.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }

    /// Returns true iff the accommodation is REJECTED or SUSPENDED.
    pub fn can_be_deleted(&self) -> bool {
        self.status.can_be_deleted()
    }
}

// Command methods
impl Accommodation {
    /// Registers a new accommodation in PENDING state.
    pub fn create(props: NewAccommodation, ids: &dyn IdGenerator) -> DomainResult<Self> {
        let name = require_text("name", &props.name)?;
        let images = validate_images(props.accommodation_type, &props.images)?;
        validate_hotel_details(props.accommodation_type, props.hotel_details.as_ref())?;

        let id = AccommodationId::generate(ids);
        let now = Utc::now();
        let mut accommodation = Self {
            id,
            version: Version::initial(),
            accommodation_type: props.accommodation_type,
            name,
            status: AccommodationStatus::Pending,
            owner_id: props.owner_id,
            address: props.address,
            location: props.location,
            description: props.description.trim().to_string(),
            images,
            amenities: props.amenities,
            policies: props.policies,
            cancellation_policy: props.cancellation_policy,
            approved_by: None,
            approved_at: None,
            hotel_details: props.hotel_details,
            created_at: now,
            updated_at: now,
            events: EventRecorder::new(),
        };
        accommodation.events.record(AccommodationEvent::created(
            id,
            props.owner_id,
            props.accommodation_type,
            now,
        ));
        Ok(accommodation)
    }

    /// Approves a pending accommodation.
    pub fn approve(&mut self, approved_by: UserId) -> DomainResult<()> {
        self.ensure(self.status.can_review(), "approve", "PENDING")?;
        let now = Utc::now();
        self.status = AccommodationStatus::Approved;
        self.record_review(approved_by, now);
        self.events
            .record(AccommodationEvent::approved(self.id, approved_by, now));
        Ok(())
    }

    /// Rejects a pending accommodation.
    pub fn reject(&mut self, rejected_by: UserId) -> DomainResult<()> {
        self.ensure(self.status.can_review(), "reject", "PENDING")?;
        let now = Utc::now();
        self.status = AccommodationStatus::Rejected;
        self.record_review(rejected_by, now);
        self.events
            .record(AccommodationEvent::rejected(self.id, rejected_by, now));
        Ok(())
    }

    /// Opens an approved accommodation for business.
    pub fn activate(&mut self) -> DomainResult<()> {
        self.ensure(self.status.can_activate(), "activate", "APPROVED")?;
        let now = Utc::now();
        self.status = AccommodationStatus::Active;
        self.updated_at = now;
        self.events.record(AccommodationEvent::activated(self.id, now));
        Ok(())
    }

    /// Takes an active accommodation offline.
    pub fn suspend(&mut self) -> DomainResult<()> {
        self.ensure(self.status.can_suspend(), "suspend", "ACTIVE")?;
        let now = Utc::now();
        self.status = AccommodationStatus::Suspended;
        self.updated_at = now;
        self.events.record(AccommodationEvent::suspended(self.id, now));
        Ok(())
    }

    /// Applies a partial update.
    ///
    /// The whole patch is validated before anything is written, so a rejected
    /// update leaves the accommodation unchanged.
    pub fn update(&mut self, patch: AccommodationUpdate) -> DomainResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let name = patch
            .name
            .map(|name| require_text("name", name))
            .transpose()?;
        let images = patch
            .images
            .map(|images| validate_images(self.accommodation_type, &images))
            .transpose()?;
        let star_rating = patch
            .star_rating
            .map(|stars| {
                if !self.accommodation_type.is_hotel() {
                    return Err(DomainError::invalid_input(
                        "star_rating",
                        "only hotels carry a star rating",
                    ));
                }
                validate_star_rating(stars)
            })
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(images) = images {
            self.images = images;
        }
        if let Some(stars) = star_rating {
            let details = self.hotel_details.take().unwrap_or_default();
            self.hotel_details = Some(details.with_star_rating(stars)?);
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(amenities) = patch.amenities {
            self.amenities = amenities;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(policies) = patch.policies {
            self.policies = policies;
        }
        if let Some(cancellation_policy) = patch.cancellation_policy {
            self.cancellation_policy = cancellation_policy;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn update_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        self.update(AccommodationUpdate {
            name: Some(name.into()),
            ..Default::default()
        })
    }

    pub fn update_address(&mut self, address: Address) -> DomainResult<()> {
        self.update(AccommodationUpdate {
            address: Some(address),
            ..Default::default()
        })
    }

    pub fn update_images(&mut self, images: Vec<String>) -> DomainResult<()> {
        self.update(AccommodationUpdate {
            images: Some(images),
            ..Default::default()
        })
    }
}

impl Accommodation {
    fn ensure(&self, allowed: bool, operation: &'static str, required: &str) -> DomainResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(DomainError::invalid_state(
                ENTITY,
                operation,
                self.status,
                required,
            ))
        }
    }

    fn record_review(&mut self, reviewer: UserId, at: DateTime<Utc>) {
        self.approved_by = Some(reviewer);
        self.approved_at = Some(at);
        self.updated_at = at;
    }
}

fn validate_images(
    accommodation_type: AccommodationType,
    images: &[String],
) -> DomainResult<Vec<String>> {
    let bounds = accommodation_type.image_bounds();
    if !bounds.contains(&images.len()) {
        return Err(DomainError::invalid_input(
            "images",
            format!(
                "a {} needs {} to {} images, got {}",
                accommodation_type,
                bounds.start(),
                bounds.end(),
                images.len()
            ),
        ));
    }
    images.iter().map(|url| require_text("images", url)).collect()
}

fn validate_hotel_details(
    accommodation_type: AccommodationType,
    details: Option<&HotelDetails>,
) -> DomainResult<()> {
    if details.is_some() && !accommodation_type.is_hotel() {
        return Err(DomainError::invalid_input(
            "hotel_details",
            "only hotels carry hotel details",
        ));
    }
    Ok(())
}

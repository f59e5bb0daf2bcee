//! Rules that span an accommodation and the resources attached to it.

use common::UserId;

use crate::accommodation::{Accommodation, AccommodationType};
use crate::aggregate::Entity;
use crate::error::{DomainError, DomainResult};

const ENTITY: &str = "accommodation";

/// Stateless checks run by the orchestrator before touching child resources
/// or removing an accommodation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LodgingPolicy;

impl LodgingPolicy {
    /// Floors exist only in hotels.
    pub fn ensure_can_add_floor(&self, accommodation: &Accommodation) -> DomainResult<()> {
        require_type(accommodation, AccommodationType::Hotel, "add_floor")
    }

    /// Room types exist only in hotels.
    pub fn ensure_can_add_room_type(&self, accommodation: &Accommodation) -> DomainResult<()> {
        require_type(accommodation, AccommodationType::Hotel, "add_room_type")
    }

    /// Standalone rooms exist only in homestays.
    pub fn ensure_can_add_room(&self, accommodation: &Accommodation) -> DomainResult<()> {
        require_type(accommodation, AccommodationType::Homestay, "add_room")
    }

    /// The owner and super admins may manage an accommodation.
    pub fn ensure_can_manage(
        &self,
        accommodation: &Accommodation,
        actor: UserId,
        is_super_admin: bool,
    ) -> DomainResult<()> {
        if is_super_admin || accommodation.is_owned_by(actor) {
            return Ok(());
        }
        Err(DomainError::invalid_operation(
            ENTITY,
            "manage",
            format!("user {actor} is not the owner of {}", accommodation.id()),
        ))
    }

    /// Checks that an accommodation may be removed.
    ///
    /// `force` skips the status check only. Upcoming bookings always block.
    pub fn ensure_can_delete(
        &self,
        accommodation: &Accommodation,
        has_upcoming_bookings: bool,
        force: bool,
    ) -> DomainResult<()> {
        if has_upcoming_bookings {
            return Err(DomainError::invalid_operation(
                ENTITY,
                "delete",
                "accommodation has upcoming bookings",
            ));
        }
        if !force && !accommodation.can_be_deleted() {
            return Err(DomainError::invalid_state(
                ENTITY,
                "delete",
                accommodation.status(),
                "REJECTED or SUSPENDED",
            ));
        }
        Ok(())
    }
}

fn require_type(
    accommodation: &Accommodation,
    required: AccommodationType,
    operation: &'static str,
) -> DomainResult<()> {
    if accommodation.accommodation_type() != required {
        return Err(DomainError::invalid_operation(
            ENTITY,
            operation,
            format!(
                "only a {required} supports this, {} is a {}",
                accommodation.id(),
                accommodation.accommodation_type()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accommodation::NewAccommodation;
    use crate::error::ErrorKind;
    use crate::value_objects::{
        Address, Amenities, CancellationPolicy, CancellationPolicyType, Location, Policies,
    };
    use common::SequentialIdGenerator;

    fn accommodation(accommodation_type: AccommodationType, owner: UserId) -> Accommodation {
        let image_count = *accommodation_type.image_bounds().start();
        Accommodation::create(
            NewAccommodation {
                accommodation_type,
                name: "Harbour View".to_string(),
                owner_id: owner,
                address: Address::new("2 Le Loi", "Ben Nghe", "District 1", "HCMC", "VN").unwrap(),
                location: Location::new(10.77, 106.70).unwrap(),
                description: String::new(),
                images: (0..image_count).map(|i| format!("https://img/{i}")).collect(),
                amenities: Amenities::empty(),
                policies: Policies::new("14:00", "11:00").unwrap(),
                cancellation_policy: CancellationPolicy::new(
                    CancellationPolicyType::Flexible,
                    1,
                    100,
                )
                .unwrap(),
                hotel_details: None,
            },
            &SequentialIdGenerator::new(),
        )
        .unwrap()
    }

    #[test]
    fn floors_and_room_types_need_a_hotel() {
        let policy = LodgingPolicy;
        let hotel = accommodation(AccommodationType::Hotel, UserId::new());
        let homestay = accommodation(AccommodationType::Homestay, UserId::new());

        assert!(policy.ensure_can_add_floor(&hotel).is_ok());
        assert!(policy.ensure_can_add_room_type(&hotel).is_ok());
        assert_eq!(
            policy.ensure_can_add_floor(&homestay).unwrap_err().kind(),
            ErrorKind::InvalidOperation
        );
        assert!(policy.ensure_can_add_room_type(&homestay).is_err());
    }

    #[test]
    fn rooms_need_a_homestay() {
        let policy = LodgingPolicy;
        assert!(policy
            .ensure_can_add_room(&accommodation(AccommodationType::Homestay, UserId::new()))
            .is_ok());
        assert!(policy
            .ensure_can_add_room(&accommodation(AccommodationType::Hotel, UserId::new()))
            .is_err());
    }

    #[test]
    fn owner_or_super_admin_may_manage() {
        let policy = LodgingPolicy;
        let owner = UserId::new();
        let stranger = UserId::new();
        let hotel = accommodation(AccommodationType::Hotel, owner);

        assert!(policy.ensure_can_manage(&hotel, owner, false).is_ok());
        assert!(policy.ensure_can_manage(&hotel, stranger, true).is_ok());
        assert!(policy.ensure_can_manage(&hotel, stranger, false).is_err());
    }

    #[test]
    fn delete_requires_terminal_status_unless_forced() {
        let policy = LodgingPolicy;
        let mut hotel = accommodation(AccommodationType::Hotel, UserId::new());

        let err = policy.ensure_can_delete(&hotel, false, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(policy.ensure_can_delete(&hotel, false, true).is_ok());

        hotel.reject(UserId::new()).unwrap();
        assert!(policy.ensure_can_delete(&hotel, false, false).is_ok());
    }

    #[test]
    fn upcoming_bookings_always_block_delete() {
        let policy = LodgingPolicy;
        let mut hotel = accommodation(AccommodationType::Hotel, UserId::new());
        hotel.reject(UserId::new()).unwrap();

        for force in [false, true] {
            let err = policy.ensure_can_delete(&hotel, true, force).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        }
    }
}

//! Application services, one per aggregate.

mod accommodation;
mod floor;
mod room;
mod room_type;

pub use accommodation::AccommodationService;
pub use floor::FloorService;
pub use room::RoomService;
pub use room_type::RoomTypeService;

use common::{AccommodationId, UserId};
use domain::ports::{AccommodationRepository, AuthorizationPort};
use domain::{Accommodation, Entity, LodgingPolicy};

use crate::error::{ServiceError, ServiceResult};

/// Who is allowed to perform an operation.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Access {
    /// Super admins only.
    SuperAdmin(UserId),
    /// The owner or a super admin.
    Manager(UserId),
}

/// Loads the accommodation a child resource is being attached to.
pub(crate) async fn load_parent<H>(
    accommodations: &H,
    id: AccommodationId,
) -> ServiceResult<Accommodation>
where
    H: AccommodationRepository + ?Sized,
{
    accommodations
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Accommodation::entity_type(), id))
}

/// Fails with `Forbidden` unless `actor` owns the accommodation or is a super admin.
pub(crate) async fn ensure_manager<A>(
    authorization: &A,
    accommodation: &Accommodation,
    actor: UserId,
) -> ServiceResult<()>
where
    A: AuthorizationPort + ?Sized,
{
    let is_super_admin =
        !accommodation.is_owned_by(actor) && authorization.is_super_admin(actor).await?;
    LodgingPolicy
        .ensure_can_manage(accommodation, actor, is_super_admin)
        .map_err(|_| ServiceError::Forbidden {
            actor,
            accommodation_id: accommodation.id(),
        })
}

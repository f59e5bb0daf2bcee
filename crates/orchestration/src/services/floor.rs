//! Hotel floors.

use std::sync::Arc;

use common::{AccommodationId, FloorId, IdGenerator, RandomIdGenerator, UserId};
use domain::ports::{AccommodationRepository, AuthorizationPort, FloorRepository};
use domain::{DomainError, Entity, Floor, LodgingPolicy, NewFloor};

use crate::error::{ServiceError, ServiceResult};

use super::{ensure_manager, load_parent};

/// Manages the floors of a hotel.
///
/// Floors record no events and have no lock; writes rely on the version check.
pub struct FloorService<H, F, A>
where
    H: AccommodationRepository,
    F: FloorRepository,
    A: AuthorizationPort,
{
    accommodations: H,
    floors: F,
    authorization: A,
    ids: Arc<dyn IdGenerator>,
}

impl<H, F, A> FloorService<H, F, A>
where
    H: AccommodationRepository,
    F: FloorRepository,
    A: AuthorizationPort,
{
    pub fn new(accommodations: H, floors: F, authorization: A) -> Self {
        Self {
            accommodations,
            floors,
            authorization,
            ids: Arc::new(RandomIdGenerator),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Adds a floor to a hotel the actor manages. Floor numbers are unique per hotel.
    ///
    /// The lookup below gives the usual error message; the repository enforces
    /// uniqueness again when it commits.
    #[tracing::instrument(skip(self, props), fields(accommodation_id = %props.accommodation_id))]
    pub async fn add_floor(&self, actor: UserId, props: NewFloor) -> ServiceResult<Floor> {
        let hotel = load_parent(&self.accommodations, props.accommodation_id).await?;
        LodgingPolicy.ensure_can_add_floor(&hotel)?;
        ensure_manager(&self.authorization, &hotel, actor).await?;

        let existing = self.floors.find_by_accommodation_id(hotel.id()).await?;
        if existing
            .iter()
            .any(|floor| floor.floor_number() == props.floor_number)
        {
            return Err(DomainError::invalid_operation(
                Floor::entity_type(),
                "add_floor",
                format!("floor {} already exists", props.floor_number),
            )
            .into());
        }

        let mut floor = Floor::create(props, self.ids.as_ref())?;
        self.floors.save(&mut floor).await?;
        tracing::info!(floor_id = %floor.id(), floor_number = floor.floor_number(), "Added floor");
        Ok(floor)
    }

    /// Floors of an accommodation, lowest first.
    pub async fn floors(&self, accommodation_id: AccommodationId) -> ServiceResult<Vec<Floor>> {
        Ok(self.floors.find_by_accommodation_id(accommodation_id).await?)
    }

    pub async fn get_floor(&self, id: FloorId) -> ServiceResult<Floor> {
        self.floors
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(Floor::entity_type(), id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn block_for_maintenance(&self, id: FloorId) -> ServiceResult<Floor> {
        self.modify(id, Floor::block_for_maintenance).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn close(&self, id: FloorId) -> ServiceResult<Floor> {
        self.modify(id, Floor::close).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, id: FloorId) -> ServiceResult<Floor> {
        self.modify(id, Floor::activate).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_floor(&self, id: FloorId) -> ServiceResult<()> {
        self.floors.delete(id).await?;
        tracing::info!(floor_id = %id, "Removed floor");
        Ok(())
    }

    async fn modify(
        &self,
        id: FloorId,
        apply: impl FnOnce(&mut Floor) + Send,
    ) -> ServiceResult<Floor> {
        let mut floor = self.get_floor(id).await?;
        apply(&mut floor);
        self.floors.save(&mut floor).await?;
        Ok(floor)
    }
}

//! Accommodation registration, review and removal.

use std::sync::Arc;

use common::{AccommodationId, IdGenerator, RandomIdGenerator, UserId};
use domain::ports::{
    AccommodationRepository, AuthorizationPort, BookingPolicyPort, EventPublisher,
    RepositoryError,
};
use domain::{
    Accommodation, AccommodationUpdate, DomainResult, Entity, LodgingPolicy, NewAccommodation,
};

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::locking::{Held, bounded};
use crate::publishing::{drain, publish};

use super::{Access, ensure_manager};

/// Drives the accommodation aggregate through its lifecycle.
///
/// Every change follows the same cycle: lock (or load when the repository has
/// no locking), authorize, mutate, save, drain events, release, publish.
pub struct AccommodationService<R, P, A, B>
where
    R: AccommodationRepository,
    P: EventPublisher,
    A: AuthorizationPort,
    B: BookingPolicyPort,
{
    accommodations: R,
    publisher: P,
    authorization: A,
    bookings: B,
    policy: LodgingPolicy,
    ids: Arc<dyn IdGenerator>,
    config: Config,
}

impl<R, P, A, B> AccommodationService<R, P, A, B>
where
    R: AccommodationRepository,
    P: EventPublisher,
    A: AuthorizationPort,
    B: BookingPolicyPort,
{
    /// Creates a new accommodation service.
    pub fn new(
        accommodations: R,
        publisher: P,
        authorization: A,
        bookings: B,
        config: Config,
    ) -> Self {
        Self {
            accommodations,
            publisher,
            authorization,
            bookings,
            policy: LodgingPolicy,
            ids: Arc::new(RandomIdGenerator),
            config,
        }
    }

    /// Replaces the id generator used for new accommodations.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Registers a new accommodation in `PENDING` state.
    #[tracing::instrument(
        skip(self, props),
        fields(owner_id = %props.owner_id, accommodation_type = %props.accommodation_type)
    )]
    pub async fn register(&self, props: NewAccommodation) -> ServiceResult<Accommodation> {
        let mut accommodation = Accommodation::create(props, self.ids.as_ref())?;
        self.accommodations.save(&mut accommodation).await?;
        let envelopes = drain(&mut accommodation)?;
        publish(&self.publisher, envelopes).await?;

        tracing::info!(accommodation_id = %accommodation.id(), "Registered accommodation");
        Ok(accommodation)
    }

    pub async fn get(&self, id: AccommodationId) -> ServiceResult<Accommodation> {
        self.accommodations
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(Accommodation::entity_type(), id))
    }

    /// Approves a pending accommodation. Super admins only.
    #[tracing::instrument(skip(self))]
    pub async fn approve(
        &self,
        id: AccommodationId,
        admin: UserId,
    ) -> ServiceResult<Accommodation> {
        self.transition(id, Access::SuperAdmin(admin), "approve", |a| a.approve(admin))
            .await
    }

    /// Rejects a pending accommodation. Super admins only.
    #[tracing::instrument(skip(self))]
    pub async fn reject(&self, id: AccommodationId, admin: UserId) -> ServiceResult<Accommodation> {
        self.transition(id, Access::SuperAdmin(admin), "reject", |a| a.reject(admin))
            .await
    }

    /// Puts an approved accommodation on sale. Owner or super admin.
    #[tracing::instrument(skip(self))]
    pub async fn activate(
        &self,
        id: AccommodationId,
        actor: UserId,
    ) -> ServiceResult<Accommodation> {
        self.transition(id, Access::Manager(actor), "activate", Accommodation::activate)
            .await
    }

    /// Takes an active accommodation off sale. Super admins only.
    #[tracing::instrument(skip(self))]
    pub async fn suspend(
        &self,
        id: AccommodationId,
        admin: UserId,
    ) -> ServiceResult<Accommodation> {
        self.transition(id, Access::SuperAdmin(admin), "suspend", Accommodation::suspend)
            .await
    }

    /// Applies a partial update. Owner or super admin.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: AccommodationId,
        actor: UserId,
        patch: AccommodationUpdate,
    ) -> ServiceResult<Accommodation> {
        self.modify(id, Access::Manager(actor), move |a| a.update(patch))
            .await
    }

    /// Removes an accommodation.
    ///
    /// Bookings starting within the configured horizon always block removal.
    /// `force` skips the status check only.
    #[tracing::instrument(skip(self))]
    pub async fn delete(
        &self,
        id: AccommodationId,
        actor: UserId,
        force: bool,
    ) -> ServiceResult<()> {
        let held = self.hold(id).await?;
        self.authorize(Access::Manager(actor), &held).await?;

        let within_days = self.config.booking_horizon_days;
        let upcoming = self.bookings.has_upcoming_bookings(id, within_days).await?;
        if let Err(err) = self.policy.ensure_can_delete(&held, upcoming, force) {
            if upcoming {
                return Err(ServiceError::UpcomingBookings {
                    accommodation_id: id,
                    within_days,
                });
            }
            return Err(err.into());
        }
        if force && !held.can_be_deleted() {
            tracing::warn!(
                accommodation_id = %id,
                status = %held.status(),
                "Force-deleting accommodation"
            );
        }

        self.accommodations.delete(id).await?;
        drop(held);
        tracing::info!(accommodation_id = %id, "Deleted accommodation");
        Ok(())
    }

    async fn transition(
        &self,
        id: AccommodationId,
        access: Access,
        transition: &'static str,
        apply: impl FnOnce(&mut Accommodation) -> DomainResult<()> + Send,
    ) -> ServiceResult<Accommodation> {
        let accommodation = self.modify(id, access, apply).await?;
        metrics::counter!("accommodation_transitions_total", "transition" => transition)
            .increment(1);
        tracing::info!(
            accommodation_id = %id,
            transition,
            status = %accommodation.status(),
            "Accommodation transitioned"
        );
        Ok(accommodation)
    }

    async fn modify(
        &self,
        id: AccommodationId,
        access: Access,
        apply: impl FnOnce(&mut Accommodation) -> DomainResult<()> + Send,
    ) -> ServiceResult<Accommodation> {
        let mut held = self.hold(id).await?;
        self.authorize(access, &held).await?;

        apply(&mut *held)?;
        self.accommodations.save(&mut *held).await?;
        let envelopes = drain(&mut *held)?;
        let accommodation = held.release();

        publish(&self.publisher, envelopes).await?;
        Ok(accommodation)
    }

    /// Locks the accommodation, or loads it when the repository cannot lock.
    async fn hold(&self, id: AccommodationId) -> ServiceResult<Held<Accommodation>> {
        let entity = Accommodation::entity_type();
        let lock = self.accommodations.lock_by_id(id);
        match bounded(entity, id, self.config.lock_timeout, lock).await {
            Ok(locked) => Ok(Held::Locked(locked)),
            Err(ServiceError::Repository(RepositoryError::LockingUnsupported { .. })) => {
                tracing::debug!(
                    accommodation_id = %id,
                    "Locking unsupported, relying on version check"
                );
                metrics::counter!("optimistic_fallbacks_total", "entity" => entity).increment(1);
                let accommodation = self.get(id).await?;
                Ok(Held::Loaded(accommodation))
            }
            Err(err) => Err(err),
        }
    }

    async fn authorize(&self, access: Access, accommodation: &Accommodation) -> ServiceResult<()> {
        match access {
            Access::SuperAdmin(actor) => {
                if !self.authorization.is_super_admin(actor).await? {
                    return Err(ServiceError::Forbidden {
                        actor,
                        accommodation_id: accommodation.id(),
                    });
                }
                Ok(())
            }
            Access::Manager(actor) => {
                ensure_manager(&self.authorization, accommodation, actor).await
            }
        }
    }
}

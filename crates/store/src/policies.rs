//! In-memory stand-ins for the booking and identity contexts.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use common::{AccommodationId, UserId};
use domain::ports::{AuthorizationPort, BookingPolicyPort, PortError};

#[derive(Debug, Default)]
struct CalendarState {
    /// Days from now until each booking starts.
    bookings: HashMap<AccommodationId, Vec<u32>>,
    unavailable: bool,
}

/// Booking calendar answering "does this accommodation have guests coming?".
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingCalendar {
    state: Arc<RwLock<CalendarState>>,
}

impl InMemoryBookingCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a booking that starts `days_from_now` days from today.
    pub fn add_booking(&self, accommodation_id: AccommodationId, days_from_now: u32) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .bookings
            .entry(accommodation_id)
            .or_default()
            .push(days_from_now);
    }

    /// Makes every query fail, as if the booking service were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .unavailable = unavailable;
    }
}

#[async_trait]
impl BookingPolicyPort for InMemoryBookingCalendar {
    async fn has_upcoming_bookings(
        &self,
        accommodation_id: AccommodationId,
        within_days: u32,
    ) -> Result<bool, PortError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.unavailable {
            return Err(PortError::unavailable("booking_policy", "calendar offline"));
        }
        Ok(state
            .bookings
            .get(&accommodation_id)
            .is_some_and(|starts| starts.iter().any(|days| *days <= within_days)))
    }
}

/// User directory that knows who the super admins are.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    super_admins: Arc<RwLock<HashSet<UserId>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant_super_admin(&self, user: UserId) {
        self.super_admins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user);
    }
}

#[async_trait]
impl AuthorizationPort for InMemoryDirectory {
    async fn is_super_admin(&self, actor: UserId) -> Result<bool, PortError> {
        Ok(self
            .super_admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bookings_outside_horizon_do_not_count() {
        let calendar = InMemoryBookingCalendar::new();
        let accommodation = AccommodationId::new();
        calendar.add_booking(accommodation, 45);

        assert!(!calendar.has_upcoming_bookings(accommodation, 30).await.unwrap());
        assert!(calendar.has_upcoming_bookings(accommodation, 60).await.unwrap());
        assert!(!calendar
            .has_upcoming_bookings(AccommodationId::new(), 60)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn unavailable_calendar_fails() {
        let calendar = InMemoryBookingCalendar::new();
        calendar.set_unavailable(true);
        assert!(calendar
            .has_upcoming_bookings(AccommodationId::new(), 30)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn directory_knows_super_admins() {
        let directory = InMemoryDirectory::new();
        let admin = UserId::new();
        directory.grant_super_admin(admin);

        assert!(directory.is_super_admin(admin).await.unwrap());
        assert!(!directory.is_super_admin(UserId::new()).await.unwrap());
    }
}

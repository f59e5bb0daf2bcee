//! Accommodation kinds and review/operating state machine.

use std::ops::RangeInclusive;

labelled_enum! {
    /// Kind of property. Fixed at creation.
    pub enum AccommodationType ("type") {
        Homestay => "homestay",
        Hotel => "hotel",
    }
}

impl AccommodationType {
    /// Allowed number of gallery images for this kind of property.
    pub fn image_bounds(&self) -> RangeInclusive<usize> {
        match self {
            AccommodationType::Homestay => 3..=20,
            AccommodationType::Hotel => 5..=50,
        }
    }

    pub fn is_hotel(&self) -> bool {
        matches!(self, AccommodationType::Hotel)
    }
}

labelled_enum! {
    /// The state of an accommodation in its lifecycle.
    ///
    /// State transitions:
    /// ```text
    /// Pending ──┬──► Approved ──► Active ──► Suspended
    ///           │
    ///           └──► Rejected
    /// ```
    pub enum AccommodationStatus ("status") {
        /// Awaiting review (initial state).
        Pending => "PENDING",
        /// Accepted by a reviewer, not yet open for business.
        Approved => "APPROVED",
        /// Refused by a reviewer.
        Rejected => "REJECTED",
        /// Open for business.
        Active => "ACTIVE",
        /// Taken offline after having been active.
        Suspended => "SUSPENDED",
    }
}

impl Default for AccommodationStatus {
    fn default() -> Self {
        AccommodationStatus::Pending
    }
}

impl AccommodationStatus {
    /// Returns true if a reviewer may approve or reject in this state.
    pub fn can_review(&self) -> bool {
        matches!(self, AccommodationStatus::Pending)
    }

    /// Returns true if the accommodation can be activated in this state.
    pub fn can_activate(&self) -> bool {
        matches!(self, AccommodationStatus::Approved)
    }

    /// Returns true if the accommodation can be suspended in this state.
    pub fn can_suspend(&self) -> bool {
        matches!(self, AccommodationStatus::Active)
    }

    /// Returns true if the accommodation may be removed in this state.
    pub fn can_be_deleted(&self) -> bool {
        matches!(
            self,
            AccommodationStatus::Rejected | AccommodationStatus::Suspended
        )
    }
}

use async_trait::async_trait;
use common::{AccommodationId, UserId};
use thiserror::Error;

/// Failure of an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("{port} unavailable: {reason}")]
    Unavailable { port: &'static str, reason: String },

    #[error("{port} rejected the request: {reason}")]
    Rejected { port: &'static str, reason: String },
}

impl PortError {
    pub fn unavailable(port: &'static str, reason: impl Into<String>) -> Self {
        PortError::Unavailable {
            port,
            reason: reason.into(),
        }
    }

    pub fn rejected(port: &'static str, reason: impl Into<String>) -> Self {
        PortError::Rejected {
            port,
            reason: reason.into(),
        }
    }
}

/// Answers role questions owned by the identity context.
#[async_trait]
pub trait AuthorizationPort: Send + Sync {
    async fn is_super_admin(&self, actor: UserId) -> Result<bool, PortError>;
}

/// Answers booking questions owned by the reservation context.
#[async_trait]
pub trait BookingPolicyPort: Send + Sync {
    /// Returns true if the accommodation has bookings starting within
    /// `within_days` days from now.
    async fn has_upcoming_bookings(
        &self,
        accommodation_id: AccommodationId,
        within_days: u32,
    ) -> Result<bool, PortError>;
}

//! Service error types.

use common::{AccommodationId, UserId};
use domain::DomainError;
use domain::ports::{PortError, RepositoryError};
use thiserror::Error;

/// Coarse classification a transport layer maps to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    InvalidState,
    InvalidOperation,
    NotFound,
    Conflict,
    Forbidden,
    Unavailable,
    Internal,
}

/// Errors returned by the application services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An aggregate or value object refused the change.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Persistence failed.
    #[error("Repository error: {0}")]
    Repository(#[source] RepositoryError),

    /// An external collaborator failed.
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// The addressed entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The actor may not touch this accommodation.
    #[error("user {actor} may not manage accommodation {accommodation_id}")]
    Forbidden {
        actor: UserId,
        accommodation_id: AccommodationId,
    },

    /// Guests are arriving soon.
    #[error("accommodation {accommodation_id} has bookings within {within_days} days")]
    UpcomingBookings {
        accommodation_id: AccommodationId,
        within_days: u32,
    },

    /// The entity lock was not granted in time.
    #[error("timed out after {waited_ms}ms waiting for lock on {entity} {id}")]
    LockTimeout {
        entity: &'static str,
        id: String,
        waited_ms: u64,
    },

    /// An event could not be turned into an envelope.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(err) => match err.kind() {
                domain::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
                domain::ErrorKind::InvalidState => ErrorKind::InvalidState,
                domain::ErrorKind::InvalidOperation => ErrorKind::InvalidOperation,
                domain::ErrorKind::NotFound => ErrorKind::NotFound,
            },
            ServiceError::Repository(err) => match err {
                RepositoryError::NotFound { .. } => ErrorKind::NotFound,
                RepositoryError::ConcurrencyConflict { .. }
                | RepositoryError::CapacityExceeded { .. } => ErrorKind::Conflict,
                RepositoryError::Duplicate { .. } => ErrorKind::InvalidOperation,
                _ => ErrorKind::Internal,
            },
            ServiceError::Port(PortError::Unavailable { .. }) => ErrorKind::Unavailable,
            ServiceError::Port(PortError::Rejected { .. }) => ErrorKind::InvalidOperation,
            ServiceError::NotFound { .. } => ErrorKind::NotFound,
            ServiceError::Forbidden { .. } => ErrorKind::Forbidden,
            ServiceError::UpcomingBookings { .. } => ErrorKind::InvalidOperation,
            ServiceError::LockTimeout { .. } => ErrorKind::Conflict,
            ServiceError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            other => ServiceError::Repository(other),
        }
    }
}

/// Convenience type alias for service results.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

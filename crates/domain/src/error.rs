//! Domain error types.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification of a failure, used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    InvalidInput,
    /// Operation attempted from a state that forbids it.
    InvalidState,
    /// Business rule violation that is not a plain state guard.
    InvalidOperation,
    /// Referenced entity is absent.
    NotFound,
}

/// Errors raised by value objects and aggregates.
///
/// Every variant carries enough structured context (field, entity, operation,
/// current/required state) to render a precise message without parsing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A constructor or update received out-of-range or malformed data.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// The entity is not in a state that allows the operation.
    #[error("Cannot {operation} {entity} in {current} state (requires {required})")]
    InvalidState {
        entity: &'static str,
        operation: &'static str,
        current: String,
        required: String,
    },

    /// A business rule forbids the operation.
    #[error("Cannot {operation} {entity}: {reason}")]
    InvalidOperation {
        entity: &'static str,
        operation: &'static str,
        reason: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl DomainError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn invalid_state(
        entity: &'static str,
        operation: &'static str,
        current: impl std::fmt::Display,
        required: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            entity,
            operation,
            current: current.to_string(),
            required: required.into(),
        }
    }

    pub fn invalid_operation(
        entity: &'static str,
        operation: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOperation {
            entity,
            operation,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidInput { .. } => ErrorKind::InvalidInput,
            DomainError::InvalidState { .. } => ErrorKind::InvalidState,
            DomainError::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
        }
    }
}

/// Rejects empty or whitespace-only text, returning the trimmed value.
pub(crate) fn require_text(field: &'static str, value: impl AsRef<str>) -> DomainResult<String> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_input(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = DomainError::invalid_state("accommodation", "approve", "ACTIVE", "PENDING");
        assert_eq!(
            err.to_string(),
            "Cannot approve accommodation in ACTIVE state (requires PENDING)"
        );

        let err = DomainError::invalid_input("images", "expected 3 to 20, got 2");
        assert_eq!(err.to_string(), "Invalid images: expected 3 to 20, got 2");
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            DomainError::invalid_input("name", "blank").kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            DomainError::invalid_operation("room type", "create hotel room", "inventory exhausted")
                .kind(),
            ErrorKind::InvalidOperation
        );
        assert_eq!(
            DomainError::not_found("hotel room", "42").kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("name", "  Sea View  ").unwrap(), "Sea View");
        assert!(matches!(
            require_text("name", "   "),
            Err(DomainError::InvalidInput { field: "name", .. })
        ));
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, require_text};

/// Longest accepted room number, in characters.
pub const MAX_ROOM_NUMBER_LEN: usize = 32;

/// Door label of a physical hotel room, e.g. "101" or "B-12".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomNumber(String);

impl TryFrom<String> for RoomNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoomNumber::new(value)
    }
}

impl From<RoomNumber> for String {
    fn from(number: RoomNumber) -> Self {
        number.0
    }
}

impl RoomNumber {
    pub fn new(value: impl AsRef<str>) -> DomainResult<Self> {
        let value = require_text("room_number", value)?;
        let len = value.chars().count();
        if len > MAX_ROOM_NUMBER_LEN {
            return Err(DomainError::invalid_input(
                "room_number",
                format!("{len} characters exceeds the limit of {MAX_ROOM_NUMBER_LEN}"),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_up_to_limit() {
        assert_eq!(RoomNumber::new(" 101 ").unwrap().as_str(), "101");
        assert!(RoomNumber::new("x".repeat(MAX_ROOM_NUMBER_LEN)).is_ok());
    }

    #[test]
    fn rejects_blank_and_too_long() {
        assert!(RoomNumber::new("").is_err());
        assert!(RoomNumber::new("x".repeat(MAX_ROOM_NUMBER_LEN + 1)).is_err());
    }
}

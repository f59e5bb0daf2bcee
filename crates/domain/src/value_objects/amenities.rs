use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, require_text};

/// Ordered, duplicate-free list of amenity names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Amenities(Vec<String>);

impl TryFrom<Vec<String>> for Amenities {
    type Error = DomainError;

    fn try_from(items: Vec<String>) -> Result<Self, Self::Error> {
        Amenities::new(items)
    }
}

impl From<Amenities> for Vec<String> {
    fn from(amenities: Amenities) -> Self {
        amenities.0
    }
}

impl Amenities {
    /// Trims every entry and drops repeats, keeping the first occurrence.
    pub fn new<I, S>(items: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for item in items {
            let item = require_text("amenities", item)?;
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Ok(Self(unique))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, amenity: &str) -> bool {
        self.0.iter().any(|a| a == amenity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

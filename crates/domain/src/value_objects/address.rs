use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, require_text};

/// Postal address of an accommodation. All five parts are required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AddressParts")]
pub struct Address {
    street: String,
    ward: String,
    district: String,
    city: String,
    country: String,
}

#[derive(Deserialize)]
struct AddressParts {
    street: String,
    ward: String,
    district: String,
    city: String,
    country: String,
}

impl TryFrom<AddressParts> for Address {
    type Error = DomainError;

    fn try_from(parts: AddressParts) -> Result<Self, Self::Error> {
        Address::new(
            parts.street,
            parts.ward,
            parts.district,
            parts.city,
            parts.country,
        )
    }
}

impl Address {
    pub fn new(
        street: impl AsRef<str>,
        ward: impl AsRef<str>,
        district: impl AsRef<str>,
        city: impl AsRef<str>,
        country: impl AsRef<str>,
    ) -> DomainResult<Self> {
        Ok(Self {
            street: require_text("address.street", street)?,
            ward: require_text("address.ward", ward)?,
            district: require_text("address.district", district)?,
            city: require_text("address.city", city)?,
            country: require_text("address.country", country)?,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn ward(&self) -> &str {
        &self.ward
    }

    pub fn district(&self) -> &str {
        &self.district
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.street, self.ward, self.district, self.city, self.country
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_parts_and_formats() {
        let address = Address::new(" 12 Ly Thuong Kiet ", "Ward 4", "District 1", "HCMC", "VN")
            .unwrap();
        assert_eq!(address.street(), "12 Ly Thuong Kiet");
        assert_eq!(
            address.to_string(),
            "12 Ly Thuong Kiet, Ward 4, District 1, HCMC, VN"
        );
    }

    #[test]
    fn rejects_blank_part() {
        let err = Address::new("12 Main", "", "District 1", "HCMC", "VN").unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidInput {
                field: "address.ward",
                ..
            }
        ));
    }

    #[test]
    fn deserialization_runs_validation() {
        let json = r#"{"street":"1","ward":"2","district":"3","city":" ","country":"VN"}"#;
        assert!(serde_json::from_str::<Address>(json).is_err());
    }
}

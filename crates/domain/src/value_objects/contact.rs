use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, require_text};

/// Front-desk contact details of a hotel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ContactParts")]
pub struct ContactInfo {
    phone: Option<String>,
    email: Option<String>,
    website: Option<String>,
}

#[derive(Deserialize)]
struct ContactParts {
    phone: Option<String>,
    email: Option<String>,
    website: Option<String>,
}

impl TryFrom<ContactParts> for ContactInfo {
    type Error = DomainError;

    fn try_from(parts: ContactParts) -> Result<Self, Self::Error> {
        ContactInfo::new(parts.phone, parts.email, parts.website)
    }
}

impl ContactInfo {
    pub fn new(
        phone: Option<String>,
        email: Option<String>,
        website: Option<String>,
    ) -> DomainResult<Self> {
        let phone = phone.map(|p| require_text("contact.phone", p)).transpose()?;
        let website = website
            .map(|w| require_text("contact.website", w))
            .transpose()?;
        let email = email
            .map(|e| require_text("contact.email", e))
            .transpose()?;
        if let Some(email) = &email
            && !email.contains('@')
        {
            return Err(DomainError::invalid_input(
                "contact.email",
                format!("'{email}' is not an email address"),
            ));
        }
        Ok(Self {
            phone,
            email,
            website,
        })
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_partial_contact() {
        let contact = ContactInfo::new(Some("+84 28 1234".into()), None, None).unwrap();
        assert_eq!(contact.phone(), Some("+84 28 1234"));
        assert_eq!(contact.email(), None);
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(matches!(
            ContactInfo::new(None, Some("front-desk".into()), None),
            Err(DomainError::InvalidInput {
                field: "contact.email",
                ..
            })
        ));
    }
}

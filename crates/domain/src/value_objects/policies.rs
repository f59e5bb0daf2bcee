use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

use super::CancellationPolicyType;

/// House rules of an accommodation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Policies {
    #[serde(with = "hh_mm")]
    check_in_time: NaiveTime,
    #[serde(with = "hh_mm")]
    check_out_time: NaiveTime,
    children_allowed: bool,
    pets_allowed: bool,
    smoking_allowed: bool,
}

impl Policies {
    /// Creates policies from `HH:MM` check-in and check-out times.
    ///
    /// Children are allowed; pets and smoking are not, until changed.
    pub fn new(check_in_time: &str, check_out_time: &str) -> DomainResult<Self> {
        Ok(Self {
            check_in_time: parse_time("policies.check_in_time", check_in_time)?,
            check_out_time: parse_time("policies.check_out_time", check_out_time)?,
            children_allowed: true,
            pets_allowed: false,
            smoking_allowed: false,
        })
    }

    pub fn with_children_allowed(mut self, allowed: bool) -> Self {
        self.children_allowed = allowed;
        self
    }

    pub fn with_pets_allowed(mut self, allowed: bool) -> Self {
        self.pets_allowed = allowed;
        self
    }

    pub fn with_smoking_allowed(mut self, allowed: bool) -> Self {
        self.smoking_allowed = allowed;
        self
    }

    pub fn check_in_time(&self) -> NaiveTime {
        self.check_in_time
    }

    pub fn check_out_time(&self) -> NaiveTime {
        self.check_out_time
    }

    pub fn children_allowed(&self) -> bool {
        self.children_allowed
    }

    pub fn pets_allowed(&self) -> bool {
        self.pets_allowed
    }

    pub fn smoking_allowed(&self) -> bool {
        self.smoking_allowed
    }
}

fn parse_time(field: &'static str, value: &str) -> DomainResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| DomainError::invalid_input(field, format!("'{value}' is not an HH:MM time")))
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}

/// Refund terms offered when a guest cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CancellationParts")]
pub struct CancellationPolicy {
    policy_type: CancellationPolicyType,
    free_cancellation_days: u32,
    refund_percentage: u8,
}

#[derive(Deserialize)]
struct CancellationParts {
    policy_type: CancellationPolicyType,
    free_cancellation_days: u32,
    refund_percentage: u8,
}

impl TryFrom<CancellationParts> for CancellationPolicy {
    type Error = DomainError;

    fn try_from(parts: CancellationParts) -> Result<Self, Self::Error> {
        CancellationPolicy::new(
            parts.policy_type,
            parts.free_cancellation_days,
            parts.refund_percentage,
        )
    }
}

impl CancellationPolicy {
    pub fn new(
        policy_type: CancellationPolicyType,
        free_cancellation_days: u32,
        refund_percentage: u8,
    ) -> DomainResult<Self> {
        if refund_percentage > 100 {
            return Err(DomainError::invalid_input(
                "cancellation_policy.refund_percentage",
                format!("{refund_percentage} is outside [0, 100]"),
            ));
        }
        Ok(Self {
            policy_type,
            free_cancellation_days,
            refund_percentage,
        })
    }

    pub fn policy_type(&self) -> CancellationPolicyType {
        self.policy_type
    }

    pub fn free_cancellation_days(&self) -> u32 {
        self.free_cancellation_days
    }

    pub fn refund_percentage(&self) -> u8 {
        self.refund_percentage
    }
}

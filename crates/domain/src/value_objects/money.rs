use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Non-negative amount in a given currency, held in minor units (hundredths)
/// to avoid floating point drift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyParts")]
pub struct Money {
    /// Amount in hundredths (e.g., 1050 = 10.50).
    amount_minor: i64,
    /// ISO 4217 code, upper-case.
    currency: String,
}

#[derive(Deserialize)]
struct MoneyParts {
    amount_minor: i64,
    currency: String,
}

impl TryFrom<MoneyParts> for Money {
    type Error = DomainError;

    fn try_from(parts: MoneyParts) -> Result<Self, Self::Error> {
        Money::from_minor_units(parts.amount_minor, &parts.currency)
    }
}

impl Money {
    /// Creates money from a decimal amount, rounded to two decimals.
    pub fn new(amount: f64, currency: &str) -> DomainResult<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::invalid_input(
                "money.amount",
                format!("{amount} must be a non-negative number"),
            ));
        }
        let minor = checked_minor_units((amount * 100.0).round())?;
        Self::from_minor_units(minor, currency)
    }

    /// Creates money from hundredths.
    pub fn from_minor_units(amount_minor: i64, currency: &str) -> DomainResult<Self> {
        if amount_minor < 0 {
            return Err(DomainError::invalid_input(
                "money.amount",
                format!("{amount_minor} must be non-negative"),
            ));
        }
        Ok(Self {
            amount_minor,
            currency: parse_currency(currency)?,
        })
    }

    /// Returns the amount as a decimal number.
    pub fn amount(&self) -> f64 {
        self.amount_minor as f64 / 100.0
    }

    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }
}

fn parse_currency(code: &str) -> DomainResult<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::invalid_input(
            "money.currency",
            format!("'{code}' is not a 3-letter ISO currency code"),
        ));
    }
    Ok(code.to_ascii_uppercase())
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.amount_minor / 100,
            self.amount_minor % 100,
            self.currency
        )
    }
}

/// `i64::MAX as f64` rounds up to 2^63, which itself does not fit.
fn checked_minor_units(minor: f64) -> DomainResult<i64> {
    if minor >= i64::MAX as f64 {
        return Err(DomainError::invalid_input("money.amount", "amount is too large"));
    }
    Ok(minor as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_decimals() {
        let money = Money::new(19.999, "usd").unwrap();
        assert_eq!(money.amount_minor(), 2000);
        assert_eq!(money.currency(), "USD");
        assert_eq!(money.to_string(), "20.00 USD");

        let money = Money::new(10.004, "EUR").unwrap();
        assert_eq!(money.amount(), 10.0);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(Money::new(-0.5, "USD").is_err());
        assert!(Money::new(f64::INFINITY, "USD").is_err());
        assert!(Money::from_minor_units(-1, "USD").is_err());
    }

    #[test]
    fn rejects_bad_currency() {
        for code in ["US", "USDT", "U5D", ""] {
            assert!(matches!(
                Money::new(1.0, code),
                Err(DomainError::InvalidInput {
                    field: "money.currency",
                    ..
                })
            ));
        }
    }

    #[test]
    fn rejects_amounts_past_i64() {
        assert!(checked_minor_units(2f64.powi(63)).is_err());
        assert!(checked_minor_units(2f64.powi(64)).is_err());
        assert_eq!(checked_minor_units(2f64.powi(62)).unwrap(), 1_i64 << 62);
        assert!(Money::new(1e17, "USD").is_err());
    }

    #[test]
    fn zero_is_allowed() {
        assert!(Money::new(0.0, "VND").unwrap().is_zero());
    }

    #[test]
    fn serialized_form_is_minor_units() {
        let money = Money::new(1250.5, "VND").unwrap();
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json, serde_json::json!({"amount_minor": 125050, "currency": "VND"}));
        let back: Money = serde_json::from_value(json).unwrap();
        assert_eq!(back, money);
    }
}

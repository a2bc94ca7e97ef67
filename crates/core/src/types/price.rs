//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are US dollars. The storefront keeps dollar amounts as
//! [`Decimal`]; the payment processor wants integer cents, so conversion to
//! minor units lives here next to the rounding rule it depends on.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number (after stripping `$`).
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// ISO 4217 currency code. Only US dollars are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// The three-letter code sent to the payment processor.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
        }
    }
}

/// A non-negative dollar amount.
///
/// Parses from catalog strings such as `"$170.00"` as well as bare numbers,
/// and displays as `$170.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a dollar amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The dollar amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", round_cents(self.0))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).replace(',', "");
        let amount =
            Decimal::from_str(&digits).map_err(|_| PriceError::Invalid(trimmed.to_string()))?;
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:.2}", self.0))
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
            Raw::Number(number) => Decimal::from_f64(number)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {number}")))
                .and_then(|amount| Self::new(amount).map_err(serde::de::Error::custom)),
        }
    }
}

/// Round a dollar amount to whole cents, halves away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a dollar amount to integer cents, halves away from zero.
///
/// Returns `None` if the result does not fit in an `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (round_cents(amount) * Decimal::ONE_HUNDRED).to_i64()
}

/// Convert integer cents back to a dollar amount.
#[must_use]
pub fn from_minor_units(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_price_string() {
        let price: Price = "$170.00".parse().unwrap();
        assert_eq!(price.amount(), Decimal::new(17000, 2));
        assert_eq!(price.to_string(), "$170.00");
    }

    #[test]
    fn test_parse_bare_and_grouped_amounts() {
        assert_eq!("89.5".parse::<Price>().unwrap().to_string(), "$89.50");
        assert_eq!(
            "$1,250.00".parse::<Price>().unwrap().amount(),
            Decimal::new(1250, 0)
        );
    }

    #[test]
    fn test_parse_rejects_garbage_and_negative() {
        assert!(matches!(
            "free".parse::<Price>(),
            Err(PriceError::Invalid(_))
        ));
        assert_eq!("-5".parse::<Price>(), Err(PriceError::Negative));
    }

    #[test]
    fn test_deserialize_string_or_number() {
        let from_text: Price = serde_json::from_str("\"$170.00\"").unwrap();
        let from_number: Price = serde_json::from_str("170").unwrap();
        assert_eq!(from_text, from_number);
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "\"170.00\"");
    }

    #[test]
    fn test_minor_units_round_half_away_from_zero() {
        assert_eq!(to_minor_units(Decimal::new(363_80, 2)), Some(36380));
        // 460.742 -> 460.74, 0.125 -> 0.13
        assert_eq!(to_minor_units(Decimal::new(460_742, 3)), Some(46074));
        assert_eq!(to_minor_units(Decimal::new(125, 3)), Some(13));
        assert_eq!(from_minor_units(36380), Decimal::new(36380, 2));
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(CurrencyCode::default().code(), "USD");
    }
}

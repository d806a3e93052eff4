//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel over the wire as plain JSON numbers (`"price": 19.99`), so
//! serialization goes through `rust_decimal::serde::float`. Negative amounts
//! are rejected at every entry point, including deserialization.

use core::fmt;
use core::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest representable price.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price multiplied by a quantity, saturating at [`Price::MAX`].
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map_or(Self::MAX, Self)
    }

    /// Sum of two prices, saturating at [`Price::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        self.0.checked_add(other.0).map_or(Self::MAX, Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl std::str::FromStr for Price {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s
            .trim()
            .trim_start_matches('$')
            .parse::<Decimal>()
            .map_err(|e| format!("invalid price '{s}': {e}"))?;
        Self::new(amount).map_err(|e| e.to_string())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 0)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times_and_sum() {
        let ten = Price::from_cents(1000).unwrap();
        let total: Price = [ten.times(2), ten.times(3)].into_iter().sum();
        assert_eq!(total, Price::from_cents(5000).unwrap());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Price::new(Decimal::from_scientific("5e28").unwrap()).unwrap();
        assert_eq!(huge.times(2), Price::MAX);
        assert_eq!(huge.times(1), huge);

        let total: Price = [huge, huge, Price::from_cents(1).unwrap()].into_iter().sum();
        assert_eq!(total, Price::MAX);
        assert_eq!(Price::MAX.saturating_add(Price::ZERO), Price::MAX);
    }

    #[test]
    fn test_wire_format_is_a_number() {
        let price = Price::from_cents(1999).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "19.99");

        let parsed: Price = serde_json::from_str("10").unwrap();
        assert_eq!(parsed, Price::from_cents(1000).unwrap());
    }

    #[test]
    fn test_negative_wire_value_rejected() {
        assert!(serde_json::from_str::<Price>("-5").is_err());
    }

    #[test]
    fn test_display_and_parse() {
        let price: Price = "$12.5".parse().unwrap();
        assert_eq!(price.to_string(), "$12.50");
        assert!("abc".parse::<Price>().is_err());
    }
}

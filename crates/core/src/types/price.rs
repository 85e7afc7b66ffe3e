//! Product price backed by decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(10, 2)` and travel over JSON as strings
//! (`"19.99"`) so no precision is lost to floating point.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The text is not a decimal number.
    #[error("price is not a decimal number: {0:?}")]
    NotANumber(String),
    /// Prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount in the shop's currency, rounded to two places.
///
/// ```
/// use corner_shop_core::Price;
///
/// let price: Price = "19.999".parse().unwrap();
/// assert_eq!(price.to_string(), "20.00");
/// assert!("-1".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places prices are kept at.
    pub const SCALE: u32 = 2;

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        let mut rounded = amount.round_dp(Self::SCALE);
        rounded.rescale(Self::SCALE);
        Ok(Self(rounded))
    }

    /// Create a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for negative cent values.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, Self::SCALE))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let price: Price = "12.5".parse().unwrap();
        assert_eq!(price.to_string(), "12.50");

        let price: Price = " 0 ".parse().unwrap();
        assert_eq!(price.to_string(), "0.00");
    }

    #[test]
    fn test_rejects_negative_and_garbage() {
        assert_eq!("-0.01".parse::<Price>(), Err(PriceError::Negative));
        assert!(matches!(
            "cheap".parse::<Price>(),
            Err(PriceError::NotANumber(_))
        ));
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1999).unwrap().to_string(), "19.99");
    }

    #[test]
    fn test_ordering() {
        let low: Price = "5".parse().unwrap();
        let high: Price = "5.01".parse().unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_serializes_as_string() {
        let price = Price::from_cents(250).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"2.50\"");

        let parsed: Price = serde_json::from_str("\"2.5\"").unwrap();
        assert_eq!(parsed, price);
    }
}

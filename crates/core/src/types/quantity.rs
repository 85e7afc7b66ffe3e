//! Item quantity type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities must be at least one.
    #[error("quantity must be at least 1 (got {0})")]
    NotPositive(i32),
}

/// A strictly positive number of units of a product.
///
/// ```
/// use corner_shop_core::Quantity;
///
/// assert_eq!(Quantity::new(3).unwrap().get(), 3);
/// assert!(Quantity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// Create a quantity, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] if `value < 1`.
    pub const fn new(value: i32) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// The number of units.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Add two quantities, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::new(-4), Err(QuantityError::NotPositive(-4)));
    }

    #[test]
    fn test_checked_add() {
        let two = Quantity::new(2).unwrap();
        let three = Quantity::new(3).unwrap();
        assert_eq!(two.checked_add(three), Quantity::new(5).ok());

        let max = Quantity::new(i32::MAX).unwrap();
        assert_eq!(max.checked_add(two), None);
    }

    #[test]
    fn test_deserialize_validates() {
        let q: Quantity = serde_json::from_str("4").unwrap();
        assert_eq!(q.get(), 4);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }
}

//! Type-safe item price using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("not a valid decimal value")]
    Invalid,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative item price in the store's currency.
///
/// Backed by [`Decimal`] so `"3.50"` stays exactly 3.50. The canonical string
/// form (used for storage) is the decimal's own `Display`.
///
/// ```
/// use grocery_core::Price;
///
/// let price = Price::parse("3.50").unwrap();
/// assert_eq!(price.to_string(), "$3.50");
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price from user input or a stored value.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] for non-numeric input and
    /// [`PriceError::Negative`] for values below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid)?;
        Self::new(amount)
    }

    /// Wrap an existing decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Canonical string used for storage and for pre-filling forms.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

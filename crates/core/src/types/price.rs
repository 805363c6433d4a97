//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel over the wire as JSON numbers (`"price": 19.99`) but are
//! held as [`Decimal`] so that what the user typed is what gets displayed.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a price typed into the editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price is required")]
    Empty,
    #[error("price must be a valid number (got {0:?})")]
    NotANumber(String),
    #[error("price must not be negative (got {0})")]
    Negative(Decimal),
    #[error("price is out of range (got {0:?})")]
    OutOfRange(String),
}

/// A non-negative product price.
///
/// Serialized as a JSON number. Values received from the Catalog API are
/// accepted as-is; values typed by a user go through [`Price::parse`], which
/// enforces the non-negative rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse user input into a price.
    ///
    /// Accepts plain decimals (`19.99`) and scientific notation (`1.5e2`).
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the input is blank, not a finite number,
    /// negative, or a finite number a [`Decimal`] cannot hold.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        // Decimal accepts digit-group underscores; a number input does not.
        if trimmed.contains('_') {
            return Err(PriceError::NotANumber(trimmed.to_string()));
        }

        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| {
                if f64::from_str(trimmed).is_ok_and(f64::is_finite) {
                    PriceError::OutOfRange(trimmed.to_string())
                } else {
                    PriceError::NotANumber(trimmed.to_string())
                }
            })?;

        if amount.is_zero() {
            return Ok(Self(Decimal::ZERO));
        }
        if amount.is_sign_negative() {
            return Err(PriceError::Negative(amount));
        }

        Ok(Self(amount))
    }

    /// Format for display in the listing (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

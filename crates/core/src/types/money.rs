//! Chilean peso amounts.
//!
//! CLP has no minor unit in circulation, so amounts are whole pesos held in
//! an `i64`. Percentage rates (the student discount) go through
//! [`rust_decimal`] and round half-up back to whole pesos.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing or combining [`Clp`] amounts.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClpError {
    /// The amount is negative.
    #[error("amount cannot be negative")]
    Negative,
    /// Arithmetic overflowed the representable range.
    #[error("amount overflow")]
    Overflow,
}

/// An amount of Chilean pesos.
///
/// ## Examples
///
/// ```
/// use levelup_core::Clp;
///
/// let price = Clp::new(49_990).unwrap();
/// let total = price.checked_mul(3).unwrap();
/// assert_eq!(total.as_i64(), 149_970);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Clp(i64);

impl Clp {
    /// Zero pesos.
    pub const ZERO: Self = Self(0);

    /// Create an amount from whole pesos.
    ///
    /// # Errors
    ///
    /// Returns [`ClpError::Negative`] if `amount` is below zero.
    pub const fn new(amount: i64) -> Result<Self, ClpError> {
        if amount < 0 {
            Err(ClpError::Negative)
        } else {
            Ok(Self(amount))
        }
    }

    /// Returns the amount in whole pesos.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`ClpError::Overflow`] if the sum does not fit in `i64`.
    pub const fn checked_add(self, other: Self) -> Result<Self, ClpError> {
        match self.0.checked_add(other.0) {
            Some(sum) => Ok(Self(sum)),
            None => Err(ClpError::Overflow),
        }
    }

    /// Subtract `other` from this amount.
    ///
    /// # Errors
    ///
    /// Returns [`ClpError::Negative`] if the result would drop below zero.
    pub const fn checked_sub(self, other: Self) -> Result<Self, ClpError> {
        if other.0 > self.0 {
            Err(ClpError::Negative)
        } else {
            Ok(Self(self.0 - other.0))
        }
    }

    /// Multiply by a unit quantity.
    ///
    /// # Errors
    ///
    /// Returns [`ClpError::Overflow`] if the product does not fit in `i64`,
    /// or [`ClpError::Negative`] if `quantity` is below zero.
    pub const fn checked_mul(self, quantity: i64) -> Result<Self, ClpError> {
        if quantity < 0 {
            return Err(ClpError::Negative);
        }
        match self.0.checked_mul(quantity) {
            Some(product) => Ok(Self(product)),
            None => Err(ClpError::Overflow),
        }
    }

    /// Apply a fractional rate (e.g. `0.20` for 20%), rounding half-up to
    /// whole pesos.
    ///
    /// # Errors
    ///
    /// Returns [`ClpError::Overflow`] if the result does not fit in `i64`,
    /// or [`ClpError::Negative`] if `rate` is below zero.
    pub fn apply_rate(self, rate: Decimal) -> Result<Self, ClpError> {
        if rate.is_sign_negative() {
            return Err(ClpError::Negative);
        }
        let amount = Decimal::from(self.0)
            .checked_mul(rate)
            .ok_or(ClpError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        amount.to_i64().map(Self).ok_or(ClpError::Overflow)
    }
}

impl fmt::Display for Clp {
    /// Formats as `$1.234` with dot thousands separators, the Chilean
    /// convention.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        out.push('$');
        let offset = digits.len() % 3;
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        f.write_str(&out)
    }
}

impl TryFrom<i64> for Clp {
    type Error = ClpError;

    fn try_from(amount: i64) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Clp> for i64 {
    fn from(amount: Clp) -> Self {
        amount.as_i64()
    }
}

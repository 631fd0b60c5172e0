//! Loyalty point balances.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when adjusting a [`Points`] balance.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsError {
    /// The adjustment would take the balance below zero.
    #[error("insufficient points: balance {balance}, requested change {delta}")]
    Insufficient {
        /// Balance before the adjustment.
        balance: i64,
        /// Signed change that was requested.
        delta: i64,
    },
    /// Arithmetic overflowed the representable range.
    #[error("points overflow")]
    Overflow,
}

/// A loyalty point balance.
///
/// Balances are non-negative by construction. Every mutation goes through
/// [`Points::checked_apply`], which is also where the ledger gets its
/// `balance_after` value, so a balance can never silently drift negative.
///
/// ## Examples
///
/// ```
/// use levelup_core::Points;
///
/// let balance = Points::new(100).unwrap();
/// let after = balance.checked_apply(-30).unwrap();
/// assert_eq!(after.as_i64(), 70);
/// assert!(after.checked_apply(-100).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Points(i64);

impl Points {
    /// An empty balance.
    pub const ZERO: Self = Self(0);

    /// Create a balance from a point count.
    ///
    /// # Errors
    ///
    /// Returns [`PointsError::Insufficient`] if `points` is below zero.
    pub const fn new(points: i64) -> Result<Self, PointsError> {
        if points < 0 {
            Err(PointsError::Insufficient {
                balance: 0,
                delta: points,
            })
        } else {
            Ok(Self(points))
        }
    }

    /// Returns the balance as a point count.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Whether the balance is empty.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Apply a signed adjustment, returning the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`PointsError::Insufficient`] if the adjustment would take the
    /// balance below zero, or [`PointsError::Overflow`] if it does not fit in
    /// `i64`.
    pub const fn checked_apply(self, delta: i64) -> Result<Self, PointsError> {
        match self.0.checked_add(delta) {
            Some(next) if next >= 0 => Ok(Self(next)),
            Some(_) => Err(PointsError::Insufficient {
                balance: self.0,
                delta,
            }),
            None => Err(PointsError::Overflow),
        }
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Points {
    type Error = PointsError;

    fn try_from(points: i64) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Points> for i64 {
    fn from(points: Points) -> Self {
        points.as_i64()
    }
}

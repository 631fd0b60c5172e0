//! Checkout pricing rules.
//!
//! The storefront prices every order the same way:
//!
//! 1. Shipping is a flat [`BASE_SHIPPING`] charge, waived once the item
//!    subtotal reaches [`FREE_SHIPPING_THRESHOLD`].
//! 2. Duoc students get a 20% discount on the item subtotal. Shipping is
//!    never discounted.
//! 3. Every 1000 pesos of item subtotal earns 10 loyalty points, floored.
//!
//! [`quote`] is the single entry point; the order flow and the advisory
//! quote endpoint both go through it so the two can never disagree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Clp, ClpError};

const fn clp(amount: i64) -> Clp {
    match Clp::new(amount) {
        Ok(amount) => amount,
        Err(_) => panic!("pricing constants are non-negative"),
    }
}

/// Flat shipping charge for orders below the free shipping threshold.
pub const BASE_SHIPPING: Clp = clp(5_000);

/// Item subtotal at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Clp = clp(100_000);

/// Points are earned per whole step of this many pesos of subtotal.
pub const POINTS_STEP_CLP: i64 = 1_000;

/// Points earned per [`POINTS_STEP_CLP`] of subtotal.
pub const POINTS_PER_STEP: i64 = 10;

/// Discount rate applied to the item subtotal for Duoc students.
#[must_use]
pub fn duoc_discount_rate() -> Decimal {
    Decimal::new(20, 2)
}

/// A priced order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Sum of line prices before shipping and discounts.
    pub subtotal: Clp,
    /// Shipping charge, zero at or above the free threshold.
    pub shipping_price: Clp,
    /// Student discount on the subtotal, zero for everyone else.
    pub discount: Clp,
    /// `subtotal + shipping_price - discount`.
    pub total_price: Clp,
    /// Loyalty points the buyer earns on this order.
    pub points_earned: i64,
}

/// Price an order from its item subtotal.
///
/// # Errors
///
/// Returns [`ClpError::Overflow`] if the subtotal is large enough to
/// overflow the total.
pub fn quote(subtotal: Clp, has_duoc_discount: bool) -> Result<Quote, ClpError> {
    let shipping_price = if subtotal >= FREE_SHIPPING_THRESHOLD {
        Clp::ZERO
    } else {
        BASE_SHIPPING
    };

    let discount = if has_duoc_discount {
        subtotal.apply_rate(duoc_discount_rate())?
    } else {
        Clp::ZERO
    };

    let total_price = subtotal.checked_add(shipping_price)?.checked_sub(discount)?;

    Ok(Quote {
        subtotal,
        shipping_price,
        discount,
        total_price,
        points_earned: points_earned(subtotal),
    })
}

/// Loyalty points earned for an item subtotal.
///
/// Ten points per whole 1000 pesos; partial steps earn nothing.
#[must_use]
pub const fn points_earned(subtotal: Clp) -> i64 {
    (subtotal.as_i64() / POINTS_STEP_CLP) * POINTS_PER_STEP
}

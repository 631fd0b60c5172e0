//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use levelup_core::{Clp, OrderId, OrderStatus, ProductId, UserId};

use super::Address;

/// What an order line remembers about the product at purchase time.
///
/// A snapshot, not a reference: later catalog edits never rewrite history.
/// `id` is `None` for lines that never lived in the catalog (redeemed
/// rewards); a `Some` id that no longer resolves means the product was
/// deleted after the sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    /// Unit price at purchase time.
    pub price: Clp,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl OrderItem {
    /// Line total, `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Clp> {
        self.product.price.checked_mul(i64::from(self.quantity)).ok()
    }
}

/// A placed order.
///
/// Orders are never deleted; `status` walks the fulfillment state machine
/// and `is_paid` is always true because payment is simulated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub payment_method: String,
    pub total_price: Clp,
    pub shipping_price: Clp,
    /// Loyalty points credited for this order, computed from the item
    /// snapshots at creation.
    pub points_earned: i64,
    pub is_paid: bool,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

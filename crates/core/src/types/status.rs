//! Status enums for orders and rewards.
//!
//! Wire values are the Spanish labels the storefront and admin UI render
//! directly, so the serde renames are part of the public API.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Statuses form a small state machine; [`OrderStatus::can_transition_to`]
/// is the single source of truth for which moves are legal:
///
/// ```text
/// Pending ──> Processing ──> Shipped ──> Delivered
///    │             │
///    └──> Cancelled <──┘
/// ```
///
/// `Delivered` and `Cancelled` are terminal. An order that has shipped can
/// no longer be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Procesando")]
    Processing,
    #[serde(rename = "Enviado")]
    Shipped,
    #[serde(rename = "Entregado")]
    Delivered,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// Whether no further transitions are allowed from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether a transition from `self` to `next` is legal.
    ///
    /// Self-transitions are not legal; a status update must move the order.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }

    /// The statuses reachable from this one in a single step.
    #[must_use]
    pub const fn successors(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Processing, Self::Cancelled],
            Self::Processing => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered],
            Self::Delivered | Self::Cancelled => &[],
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pendiente"),
            Self::Processing => write!(f, "Procesando"),
            Self::Shipped => write!(f, "Enviado"),
            Self::Delivered => write!(f, "Entregado"),
            Self::Cancelled => write!(f, "Cancelado"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendiente" => Ok(Self::Pending),
            "Procesando" => Ok(Self::Processing),
            "Enviado" => Ok(Self::Shipped),
            "Entregado" => Ok(Self::Delivered),
            "Cancelado" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// What a loyalty reward grants when redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardKind {
    /// A physical item, shipped like a purchase.
    #[serde(rename = "Producto")]
    Product,
    /// A discount coupon for a later purchase.
    #[serde(rename = "Descuento")]
    Discount,
    /// A shipping cost waiver.
    #[serde(rename = "Envio")]
    Shipping,
}

impl std::fmt::Display for RewardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product => write!(f, "Producto"),
            Self::Discount => write!(f, "Descuento"),
            Self::Shipping => write!(f, "Envio"),
        }
    }
}

impl std::str::FromStr for RewardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Producto" => Ok(Self::Product),
            "Descuento" => Ok(Self::Discount),
            "Envio" => Ok(Self::Shipping),
            _ => Err(format!("invalid reward kind: {s}")),
        }
    }
}

//! Product catalog types.

use serde::Serialize;

use levelup_core::{Clp, ProductId};

/// A product for sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Whole Chilean pesos, at least 1.
    pub price: Clp,
    pub image_url: String,
    pub specifications: String,
    pub category: String,
    /// Units on hand. Decremented when an order containing this product
    /// commits.
    pub count_in_stock: u32,
    /// Shown in the home-page "top selling" strip.
    pub is_top_selling: bool,
    /// Carried from the source data, not computed from reviews.
    pub rating: f64,
    pub num_reviews: u32,
}

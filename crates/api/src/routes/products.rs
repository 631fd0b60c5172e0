//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use levelup_core::ProductId;

use crate::{
    db::{
        ProductRepository,
        products::{NewProduct, ProductPatch},
    },
    error::Result,
    models::Product,
    state::AppState,
};

/// List the whole catalog.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(ProductRepository::new(state.db()).list_all())
}

/// List the products on the top-selling strip.
pub async fn list_top_selling(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(ProductRepository::new(state.db()).list_top_selling())
}

/// Get one product.
///
/// # Errors
///
/// Returns `404` for an unknown product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.db()).get_by_id(ProductId::new(id))?;

    Ok(Json(product))
}

/// Add a product to the catalog.
///
/// # Errors
///
/// Returns `400` for a blank name or a price below one peso.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = ProductRepository::new(state.db()).create(body)?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product.
///
/// # Errors
///
/// Returns `404` for an unknown product and `400` when a provided name
/// or price fails validation.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.db()).update(ProductId::new(id), body)?;

    Ok(Json(product))
}

/// Remove a product from the catalog.
///
/// # Errors
///
/// Returns `404` for an unknown product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    ProductRepository::new(state.db()).delete(ProductId::new(id))?;

    Ok(StatusCode::NO_CONTENT)
}

//! Order route handlers.
//!
//! Placing an order, the advisory checkout quote, the admin listing, the
//! per-user history and the fulfillment status updates.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use levelup_core::{
    Clp, OrderId, OrderStatus, UserId,
    pricing::{self, Quote},
};

use crate::{
    db::{
        OrderRepository, RepositoryError, UserRepository,
        orders::{NewOrder, items_subtotal},
    },
    error::{AppError, Result},
    models::{Address, Order, OrderItem},
    state::AppState,
};

/// Order creation request, shaped like the checkout payload.
///
/// `totalPrice` and `shippingPrice` are the amounts the client displayed;
/// the loyalty credit is recomputed server-side from the item snapshots.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    #[serde(default)]
    pub payment_method: String,
    pub total_price: Clp,
    pub shipping_price: Clp,
}

/// Cart pricing request. `userId` is optional; when present the quote
/// applies that account's student discount.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub user_id: Option<UserId>,
}

/// Query parameters for the per-user order history.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyOrdersQuery {
    pub user_id: Option<UserId>,
}

/// Status transition request.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// Place an order.
///
/// The cart check runs before the identity check, matching the error
/// priority the checkout clients rely on.
///
/// # Errors
///
/// Returns `400` for an empty cart or missing stock, `401` without a
/// user id and `404` for an unknown buyer.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    if body.items.is_empty() {
        return Err(RepositoryError::EmptyCart.into());
    }
    let user_id = body
        .user_id
        .ok_or_else(|| AppError::Unauthorized("log in to place an order".to_owned()))?;

    let order = OrderRepository::new(state.db()).create(NewOrder {
        user_id,
        items: body.items,
        shipping_address: body.shipping_address,
        payment_method: body.payment_method,
        total_price: body.total_price,
        shipping_price: body.shipping_price,
    })?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Price a cart without committing anything.
///
/// # Errors
///
/// Returns `404` when a user id is given but unknown and `400` when the
/// item amounts overflow.
pub async fn quote(
    State(state): State<AppState>,
    Json(body): Json<QuoteRequest>,
) -> Result<Json<Quote>> {
    let has_duoc_discount = match body.user_id {
        Some(user_id) => {
            UserRepository::new(state.db())
                .get_by_id(user_id)?
                .has_duoc_discount
        }
        None => false,
    };

    let subtotal = items_subtotal(&body.items)?;
    let quote = pricing::quote(subtotal, has_duoc_discount)
        .map_err(|err| RepositoryError::Validation(err.to_string()))?;

    Ok(Json(quote))
}

/// List every order.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(OrderRepository::new(state.db()).list_all())
}

/// List one user's orders. Without a `userId` the history is empty, never
/// an error; the account page calls this before login resolves.
pub async fn my_orders(
    State(state): State<AppState>,
    Query(query): Query<MyOrdersQuery>,
) -> Json<Vec<Order>> {
    let orders = match query.user_id {
        Some(user_id) => OrderRepository::new(state.db()).list_for_user(user_id),
        None => Vec::new(),
    };

    Json(orders)
}

/// Move an order to a new fulfillment status.
///
/// # Errors
///
/// Returns `404` for an unknown order and `409` for a transition the
/// state machine does not allow.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.db()).update_status(OrderId::new(id), body.status)?;

    Ok(Json(order))
}

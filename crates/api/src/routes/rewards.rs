//! Reward catalog and redemption route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use levelup_core::{RewardId, UserId};

use crate::{
    db::{
        RewardRepository,
        rewards::{NewReward, RewardPatch},
    },
    error::{AppError, Result},
    models::{Redemption, Reward, User},
    state::AppState,
};

/// Redemption request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub user_id: Option<UserId>,
}

/// Redemption response: the account after the debit plus the record.
#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub user: User,
    pub redemption: Redemption,
}

/// List the rewards customers can redeem.
pub async fn list_active(State(state): State<AppState>) -> Json<Vec<Reward>> {
    Json(RewardRepository::new(state.db()).list_active())
}

/// List the whole catalog, inactive rewards included.
pub async fn list_all(State(state): State<AppState>) -> Json<Vec<Reward>> {
    Json(RewardRepository::new(state.db()).list_all())
}

/// Create a reward.
///
/// # Errors
///
/// Returns `400` when the name is shorter than three characters, the
/// cost is below one point or the image is missing.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewReward>,
) -> Result<(StatusCode, Json<Reward>)> {
    let reward = RewardRepository::new(state.db()).create(body)?;

    Ok((StatusCode::CREATED, Json(reward)))
}

/// Update a reward.
///
/// # Errors
///
/// Returns `404` for an unknown reward and `400` when a provided name or
/// cost fails validation.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RewardPatch>,
) -> Result<Json<Reward>> {
    let reward = RewardRepository::new(state.db()).update(RewardId::new(id), body)?;

    Ok(Json(reward))
}

/// Delete a reward.
///
/// # Errors
///
/// Returns `404` for an unknown reward.
pub async fn delete_reward(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    RewardRepository::new(state.db()).delete(RewardId::new(id))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Redeem a reward for points.
///
/// The debit and the redemption record commit together; on any failure
/// the balance is untouched and nothing is recorded.
///
/// # Errors
///
/// Returns `401` without a user id, `404` for an unknown reward or user,
/// `409` for an inactive reward and `400` when the balance cannot cover
/// the cost.
pub async fn redeem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>> {
    let user_id = body
        .user_id
        .ok_or_else(|| AppError::Unauthorized("log in to redeem rewards".to_owned()))?;
    let (user, redemption) = RewardRepository::new(state.db()).redeem(user_id, RewardId::new(id))?;

    Ok(Json(RedeemResponse { user, redemption }))
}

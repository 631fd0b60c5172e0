//! Video gallery route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use levelup_core::VideoId;

use crate::{
    db::{
        VideoRepository,
        videos::{NewVideo, VideoPatch},
    },
    error::Result,
    models::Video,
    state::AppState,
};

/// List every video.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Video>> {
    Json(VideoRepository::new(state.db()).list_all())
}

/// List the featured videos, at most two.
pub async fn list_featured(State(state): State<AppState>) -> Json<Vec<Video>> {
    Json(VideoRepository::new(state.db()).list_featured())
}

/// Create a video.
///
/// # Errors
///
/// Returns `400` for a missing title or embed URL.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewVideo>,
) -> Result<(StatusCode, Json<Video>)> {
    let video = VideoRepository::new(state.db()).create(body)?;

    Ok((StatusCode::CREATED, Json(video)))
}

/// Update a video.
///
/// # Errors
///
/// Returns `404` for an unknown video.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<VideoPatch>,
) -> Result<Json<Video>> {
    let video = VideoRepository::new(state.db()).update(VideoId::new(id), body)?;

    Ok(Json(video))
}

/// Delete a video.
///
/// # Errors
///
/// Returns `404` for an unknown video.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    VideoRepository::new(state.db()).delete(VideoId::new(id))?;

    Ok(StatusCode::NO_CONTENT)
}

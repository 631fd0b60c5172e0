//! Blog route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use levelup_core::PostId;

use crate::{
    db::{
        BlogRepository,
        blog::{NewPost, PostPatch},
    },
    error::Result,
    models::BlogPost,
    state::AppState,
};

/// List every post, newest first.
pub async fn list(State(state): State<AppState>) -> Json<Vec<BlogPost>> {
    Json(BlogRepository::new(state.db()).list_all())
}

/// Get one post.
///
/// # Errors
///
/// Returns `404` for an unknown post.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogPost>> {
    let post = BlogRepository::new(state.db()).get_by_id(PostId::new(id))?;

    Ok(Json(post))
}

/// Create a post.
///
/// # Errors
///
/// Returns `400` for a missing title or content.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewPost>,
) -> Result<(StatusCode, Json<BlogPost>)> {
    let post = BlogRepository::new(state.db()).create(body)?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a post.
///
/// # Errors
///
/// Returns `404` for an unknown post.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PostPatch>,
) -> Result<Json<BlogPost>> {
    let post = BlogRepository::new(state.db()).update(PostId::new(id), body)?;

    Ok(Json(post))
}

/// Delete a post.
///
/// # Errors
///
/// Returns `404` for an unknown post.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    BlogRepository::new(state.db()).delete(PostId::new(id))?;

    Ok(StatusCode::NO_CONTENT)
}

//! Community event route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use levelup_core::EventId;

use crate::{
    db::{
        EventRepository,
        events::{EventPatch, NewEvent},
    },
    error::Result,
    models::Event,
    state::AppState,
};

/// List every event, soonest first.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(EventRepository::new(state.db()).list_all())
}

/// Create an event.
///
/// # Errors
///
/// Returns `400` for a missing title, date or location, or a date in the
/// past.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = EventRepository::new(state.db()).create(body)?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event.
///
/// # Errors
///
/// Returns `404` for an unknown event.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<EventPatch>,
) -> Result<Json<Event>> {
    let event = EventRepository::new(state.db()).update(EventId::new(id), body)?;

    Ok(Json(event))
}

/// Delete an event.
///
/// # Errors
///
/// Returns `404` for an unknown event.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    EventRepository::new(state.db()).delete(EventId::new(id))?;

    Ok(StatusCode::NO_CONTENT)
}

//! Community event repository.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use levelup_core::EventId;

use super::{Db, RepositoryError};
use crate::models::Event;

/// Start time assigned when the client leaves it out.
const DEFAULT_TIME: &str = "18:00";

/// Input for creating an event. Doubles as the request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub map_embed: String,
}

/// Partial event update. `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub map_embed: Option<String>,
}

/// Repository for event operations.
pub struct EventRepository<'a> {
    db: &'a Db,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// List events sorted by date, soonest first.
    #[must_use]
    pub fn list_all(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.db.read().events.iter().cloned().collect();
        events.sort_by_key(|e| e.date);
        events
    }

    /// Schedule an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if title, date, or location is
    /// missing, or if the date is in the past.
    pub fn create(&self, new: NewEvent) -> Result<Event, RepositoryError> {
        let title = required(new.title, "title")?;
        let location = required(new.location, "location")?;
        let date = new
            .date
            .ok_or_else(|| RepositoryError::Validation("date is required".to_owned()))?;
        if date < Utc::now().date_naive() {
            return Err(RepositoryError::Validation(
                "event date cannot be in the past".to_owned(),
            ));
        }

        let id = EventId::generate();
        let event = Event {
            id,
            title,
            date,
            time: new
                .time
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TIME.to_owned()),
            location,
            map_embed: new.map_embed,
        };

        let mut tables = self.db.write();
        tables.events.insert(id.as_uuid(), event.clone());

        Ok(event)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such event exists.
    pub fn update(&self, id: EventId, patch: EventPatch) -> Result<Event, RepositoryError> {
        let mut tables = self.db.write();
        let event = tables
            .events
            .get_mut(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;

        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(time) = patch.time {
            event.time = time;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(map_embed) = patch.map_embed {
            event.map_embed = map_embed;
        }

        Ok(event.clone())
    }

    /// Remove an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such event exists.
    pub fn delete(&self, id: EventId) -> Result<(), RepositoryError> {
        self.db
            .write()
            .events
            .remove(id.as_uuid())
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, RepositoryError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(RepositoryError::Validation(format!("{field} is required"))),
    }
}

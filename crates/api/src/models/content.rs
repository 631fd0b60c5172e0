//! Community content types: events, blog posts, videos.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use levelup_core::{EventId, PostId, VideoId};

/// A community event (tournament, launch night, meetup).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Event date; creation rejects dates already in the past.
    pub date: NaiveDate,
    /// Start time as displayed, e.g. "18:00".
    pub time: String,
    pub location: String,
    /// Embeddable map iframe markup, may be empty.
    pub map_embed: String,
}

/// A blog post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    pub excerpt: String,
    /// HTML body, stored verbatim.
    pub content: String,
    pub image_url: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// An embedded video.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub embed_url: String,
    /// The featured strip shows at most two of these.
    pub is_featured: bool,
}

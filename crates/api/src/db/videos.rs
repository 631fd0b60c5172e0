//! Video gallery repository.

use serde::Deserialize;

use levelup_core::VideoId;

use super::{Db, RepositoryError};
use crate::models::Video;

/// How many featured videos the home page shows.
const FEATURED_LIMIT: usize = 2;

/// Input for adding a video. Doubles as the request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub title: Option<String>,
    pub embed_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Partial video update. `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPatch {
    pub title: Option<String>,
    pub embed_url: Option<String>,
    pub is_featured: Option<bool>,
}

/// Repository for video operations.
pub struct VideoRepository<'a> {
    db: &'a Db,
}

impl<'a> VideoRepository<'a> {
    /// Create a new video repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// List all videos in insertion order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Video> {
        self.db.read().videos.iter().cloned().collect()
    }

    /// List the first featured videos, capped at two.
    #[must_use]
    pub fn list_featured(&self) -> Vec<Video> {
        self.db
            .read()
            .videos
            .iter()
            .filter(|v| v.is_featured)
            .take(FEATURED_LIMIT)
            .cloned()
            .collect()
    }

    /// Add a video.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if title or embed URL is missing.
    pub fn create(&self, new: NewVideo) -> Result<Video, RepositoryError> {
        let title = required(new.title, "title")?;
        let embed_url = required(new.embed_url, "embed URL")?;

        let id = VideoId::generate();
        let video = Video {
            id,
            title,
            embed_url,
            is_featured: new.is_featured,
        };

        let mut tables = self.db.write();
        tables.videos.insert(id.as_uuid(), video.clone());

        Ok(video)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such video exists.
    pub fn update(&self, id: VideoId, patch: VideoPatch) -> Result<Video, RepositoryError> {
        let mut tables = self.db.write();
        let video = tables
            .videos
            .get_mut(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;

        if let Some(title) = patch.title {
            video.title = title;
        }
        if let Some(embed_url) = patch.embed_url {
            video.embed_url = embed_url;
        }
        if let Some(is_featured) = patch.is_featured {
            video.is_featured = is_featured;
        }

        Ok(video.clone())
    }

    /// Remove a video.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such video exists.
    pub fn delete(&self, id: VideoId) -> Result<(), RepositoryError> {
        self.db
            .write()
            .videos
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn video(title: &str, featured: bool) -> NewVideo {
        NewVideo {
            title: Some(title.to_owned()),
            embed_url: Some(format!("https://www.youtube.com/embed/{title}")),
            is_featured: featured,
        }
    }

    #[test]
    fn test_create_requires_title_and_url() {
        let db = Db::new();
        let repo = VideoRepository::new(&db);

        assert!(matches!(
            repo.create(NewVideo {
                title: None,
                ..video("gameplay", false)
            }),
            Err(RepositoryError::Validation(_))
        ));
        assert!(matches!(
            repo.create(NewVideo {
                embed_url: None,
                ..video("gameplay", false)
            }),
            Err(RepositoryError::Validation(_))
        ));
        assert!(repo.list_all().is_empty());
    }

    #[test]
    fn test_featured_listing_is_capped_at_two() {
        let db = Db::new();
        let repo = VideoRepository::new(&db);
        let first = repo.create(video("resumen-torneo", true)).unwrap();
        repo.create(video("unboxing", false)).unwrap();
        let second = repo.create(video("speedrun", true)).unwrap();
        repo.create(video("entrevista", true)).unwrap();

        let featured: Vec<VideoId> = repo.list_featured().iter().map(|v| v.id).collect();
        assert_eq!(featured, [first.id, second.id]);
        assert_eq!(repo.list_all().len(), 4);
    }

    #[test]
    fn test_update_toggles_featured() {
        let db = Db::new();
        let repo = VideoRepository::new(&db);
        let created = repo.create(video("gameplay", false)).unwrap();

        let updated = repo
            .update(
                created.id,
                VideoPatch {
                    is_featured: Some(true),
                    ..VideoPatch::default()
                },
            )
            .unwrap();
        assert!(updated.is_featured);
        assert_eq!(repo.list_featured().len(), 1);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let db = Db::new();
        let repo = VideoRepository::new(&db);
        let created = repo.create(video("gameplay", false)).unwrap();

        repo.delete(created.id).unwrap();
        assert!(matches!(
            repo.delete(created.id),
            Err(RepositoryError::NotFound)
        ));
    }
}

//! Blog post repository.

use chrono::Utc;
use serde::Deserialize;

use levelup_core::PostId;

use super::{Db, RepositoryError};
use crate::models::BlogPost;

const DEFAULT_EXCERPT: &str = "Sin resumen";
const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/id/500/300/200";
const DEFAULT_AUTHOR: &str = "Admin";

/// Input for publishing a post. Doubles as the request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub author: Option<String>,
}

/// Partial post update. `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub author: Option<String>,
}

/// Repository for blog operations.
pub struct BlogRepository<'a> {
    db: &'a Db,
}

impl<'a> BlogRepository<'a> {
    /// Create a new blog repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// List posts, newest first.
    #[must_use]
    pub fn list_all(&self) -> Vec<BlogPost> {
        let mut posts: Vec<BlogPost> = self.db.read().posts.iter().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    /// Fetch one post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such post exists.
    pub fn get_by_id(&self, id: PostId) -> Result<BlogPost, RepositoryError> {
        self.db
            .read()
            .posts
            .get(id.as_uuid())
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    /// Publish a post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if title or content is missing.
    pub fn create(&self, new: NewPost) -> Result<BlogPost, RepositoryError> {
        let title = required(new.title, "title")?;
        let content = required(new.content, "content")?;

        let id = PostId::generate();
        let post = BlogPost {
            id,
            title,
            excerpt: filled_or(new.excerpt, DEFAULT_EXCERPT),
            content,
            image_url: filled_or(new.image_url, DEFAULT_IMAGE_URL),
            author: filled_or(new.author, DEFAULT_AUTHOR),
            created_at: Utc::now(),
        };

        let mut tables = self.db.write();
        tables.posts.insert(id.as_uuid(), post.clone());

        Ok(post)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such post exists.
    pub fn update(&self, id: PostId, patch: PostPatch) -> Result<BlogPost, RepositoryError> {
        let mut tables = self.db.write();
        let post = tables
            .posts
            .get_mut(id.as_uuid())
            .ok_or(RepositoryError::NotFound)?;

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(excerpt) = patch.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(image_url) = patch.image_url {
            post.image_url = image_url;
        }
        if let Some(author) = patch.author {
            post.author = author;
        }

        Ok(post.clone())
    }

    /// Remove a post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such post exists.
    pub fn delete(&self, id: PostId) -> Result<(), RepositoryError> {
        self.db
            .write()
            .posts
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

fn filled_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

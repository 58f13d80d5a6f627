//! Blog posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keystone_core::BlogPostId;

use super::{require, require_slug};

/// A blog post. `published_at = None` is a draft.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BlogPost {
    pub id: BlogPostId,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body_markdown: String,
    pub author: Option<String>,
    pub cover_image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostInput {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body_markdown: String,
    pub author: Option<String>,
    pub cover_image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPostInput {
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        require_slug(&self.slug)?;
        require("title", &self.title)?;
        require("body_markdown", &self.body_markdown)
    }
}

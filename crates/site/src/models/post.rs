use chrono::{DateTime, Utc};
use serde::Serialize;

/// A published blog post as listed on the blog index.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub cover_image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// A published blog post with its body rendered to HTML.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostSummary,
    pub body_html: String,
    pub reading_time_minutes: u32,
}

//! Published blog posts.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::PostSummary;

/// Read access to published posts. A post is published once its
/// `published_at` has passed.
pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Published posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(&self) -> Result<Vec<PostSummary>, RepositoryError> {
        let posts = sqlx::query_as::<_, PostSummary>(
            r"
            SELECT slug, title, excerpt, author, cover_image_url, published_at
            FROM site.blog_post
            WHERE published_at IS NOT NULL AND published_at <= now()
            ORDER BY published_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// A published post and its markdown body.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_published(
        &self,
        slug: &str,
    ) -> Result<Option<(PostSummary, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            summary: PostSummary,
            body_markdown: String,
        }

        let row = sqlx::query_as::<_, Row>(
            r"
            SELECT slug, title, excerpt, author, cover_image_url, published_at, body_markdown
            FROM site.blog_post
            WHERE slug = $1 AND published_at IS NOT NULL AND published_at <= now()
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|row| (row.summary, row.body_markdown)))
    }
}

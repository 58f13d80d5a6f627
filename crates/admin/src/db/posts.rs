//! Blog post repository.

use sqlx::PgPool;

use keystone_core::BlogPostId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::{BlogPost, BlogPostInput};

const POST_COLUMNS: &str = "id, slug, title, excerpt, body_markdown, author, cover_image_url, \
                            published_at, created_at, updated_at";

pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All posts including drafts. Drafts first, then newest published.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<BlogPost>, RepositoryError> {
        let posts = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS} FROM site.blog_post \
             ORDER BY published_at DESC NULLS FIRST, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BlogPostId) -> Result<Option<BlogPost>, RepositoryError> {
        let post = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS} FROM site.blog_post WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(post)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, input: &BlogPostInput) -> Result<BlogPost, RepositoryError> {
        sqlx::query_as::<_, BlogPost>(&format!(
            r"
            INSERT INTO site.blog_post
                (slug, title, excerpt, body_markdown, author, cover_image_url, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {POST_COLUMNS}
            "
        ))
        .bind(&input.slug)
        .bind(input.title.trim())
        .bind(&input.excerpt)
        .bind(&input.body_markdown)
        .bind(&input.author)
        .bind(&input.cover_image_url)
        .bind(input.published_at)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique("post slug"))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post does not exist and
    /// `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: BlogPostId,
        input: &BlogPostInput,
    ) -> Result<BlogPost, RepositoryError> {
        sqlx::query_as::<_, BlogPost>(&format!(
            r"
            UPDATE site.blog_post
            SET slug = $2, title = $3, excerpt = $4, body_markdown = $5, author = $6,
                cover_image_url = $7, published_at = $8, updated_at = now()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(input.title.trim())
        .bind(&input.excerpt)
        .bind(&input.body_markdown)
        .bind(&input.author)
        .bind(&input.cover_image_url)
        .bind(input.published_at)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique("post slug"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post does not exist.
    pub async fn delete(&self, id: BlogPostId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM site.blog_post WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

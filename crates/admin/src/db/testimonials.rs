//! Testimonial moderation.

use sqlx::PgPool;

use keystone_core::{TestimonialId, TestimonialStatus};

use super::RepositoryError;
use crate::models::Testimonial;

pub struct TestimonialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TestimonialRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Testimonials, oldest first so the moderation queue is worked in order.
    /// `None` lists every status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<TestimonialStatus>,
    ) -> Result<Vec<Testimonial>, RepositoryError> {
        let testimonials = sqlx::query_as::<_, Testimonial>(
            r"
            SELECT id, author_name, company, quote, rating, status, created_at, updated_at
            FROM site.testimonial
            WHERE $1::site.testimonial_status IS NULL OR status = $1
            ORDER BY created_at, id
            ",
        )
        .bind(status)
        .fetch_all(self.pool)
        .await?;
        Ok(testimonials)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the testimonial does not exist.
    pub async fn set_status(
        &self,
        id: TestimonialId,
        status: TestimonialStatus,
    ) -> Result<Testimonial, RepositoryError> {
        sqlx::query_as::<_, Testimonial>(
            r"
            UPDATE site.testimonial
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, author_name, company, quote, rating, status, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}

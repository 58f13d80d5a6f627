//! Testimonials: approved ones are read, submissions land as pending.

use sqlx::PgPool;

use keystone_core::{TestimonialId, TestimonialStatus};

use super::RepositoryError;
use crate::models::{NewTestimonial, Testimonial};

pub struct TestimonialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TestimonialRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Approved testimonials, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_approved(&self) -> Result<Vec<Testimonial>, RepositoryError> {
        let testimonials = sqlx::query_as::<_, Testimonial>(
            r"
            SELECT author_name, company, quote, rating
            FROM site.testimonial
            WHERE status = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(TestimonialStatus::Approved)
        .fetch_all(self.pool)
        .await?;
        Ok(testimonials)
    }

    /// Store a submission for moderation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn submit(&self, testimonial: &NewTestimonial) -> Result<TestimonialId, RepositoryError> {
        let id = sqlx::query_scalar::<_, TestimonialId>(
            r"
            INSERT INTO site.testimonial (author_name, company, quote, rating, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&testimonial.author_name)
        .bind(&testimonial.company)
        .bind(&testimonial.quote)
        .bind(testimonial.rating)
        .bind(TestimonialStatus::Pending)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }
}

//! Open job postings and applications.

use sqlx::PgPool;

use keystone_core::JobApplicationId;

use super::RepositoryError;
use crate::models::{JobPostingSummary, NewJobApplication};

pub struct CareerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CareerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Open postings, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_open(&self) -> Result<Vec<JobPostingSummary>, RepositoryError> {
        let postings = sqlx::query_as::<_, JobPostingSummary>(
            r"
            SELECT slug, title, location, employment_type, posted_at
            FROM site.job_posting
            WHERE is_open
            ORDER BY posted_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(postings)
    }

    /// An open posting and its markdown description.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_open(
        &self,
        slug: &str,
    ) -> Result<Option<(JobPostingSummary, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            summary: JobPostingSummary,
            description_markdown: String,
        }

        let row = sqlx::query_as::<_, Row>(
            r"
            SELECT slug, title, location, employment_type, posted_at, description_markdown
            FROM site.job_posting
            WHERE slug = $1 AND is_open
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|row| (row.summary, row.description_markdown)))
    }

    /// Store an application for an open posting.
    ///
    /// Returns `None` if no open posting has this slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn apply(
        &self,
        slug: &str,
        application: &NewJobApplication,
    ) -> Result<Option<JobApplicationId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, JobApplicationId>(
            r"
            INSERT INTO site.job_application
                (job_posting_id, name, email, phone, resume_url, cover_letter)
            SELECT id, $2, $3, $4, $5, $6
            FROM site.job_posting
            WHERE slug = $1 AND is_open
            RETURNING id
            ",
        )
        .bind(slug)
        .bind(&application.name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.resume_url)
        .bind(&application.cover_letter)
        .fetch_optional(self.pool)
        .await?;
        Ok(id)
    }
}

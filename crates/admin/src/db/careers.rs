//! Job postings and applications.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use keystone_core::{Email, JobApplicationId, JobPostingId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::{JobApplication, JobPosting, JobPostingInput};

const POSTING_COLUMNS: &str = "id, slug, title, location, employment_type, description_markdown, \
                               is_open, posted_at, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct JobApplicationRow {
    id: JobApplicationId,
    job_posting_id: JobPostingId,
    name: String,
    email: String,
    phone: Option<String>,
    resume_url: Option<String>,
    cover_letter: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<JobApplicationRow> for JobApplication {
    type Error = RepositoryError;

    fn try_from(row: JobApplicationRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            job_posting_id: row.job_posting_id,
            name: row.name,
            email,
            phone: row.phone,
            resume_url: row.resume_url,
            cover_letter: row.cover_letter,
            created_at: row.created_at,
        })
    }
}

pub struct CareerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CareerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every posting, open ones first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        let postings = sqlx::query_as::<_, JobPosting>(&format!(
            "SELECT {POSTING_COLUMNS} FROM site.job_posting \
             ORDER BY is_open DESC, posted_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(postings)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: JobPostingId) -> Result<Option<JobPosting>, RepositoryError> {
        let posting = sqlx::query_as::<_, JobPosting>(&format!(
            "SELECT {POSTING_COLUMNS} FROM site.job_posting WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(posting)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, input: &JobPostingInput) -> Result<JobPosting, RepositoryError> {
        sqlx::query_as::<_, JobPosting>(&format!(
            r"
            INSERT INTO site.job_posting
                (slug, title, location, employment_type, description_markdown, is_open, posted_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            RETURNING {POSTING_COLUMNS}
            "
        ))
        .bind(&input.slug)
        .bind(input.title.trim())
        .bind(input.location.trim())
        .bind(input.employment_type)
        .bind(&input.description_markdown)
        .bind(input.is_open)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique("job posting slug"))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the posting does not exist and
    /// `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: JobPostingId,
        input: &JobPostingInput,
    ) -> Result<JobPosting, RepositoryError> {
        sqlx::query_as::<_, JobPosting>(&format!(
            r"
            UPDATE site.job_posting
            SET slug = $2, title = $3, location = $4, employment_type = $5,
                description_markdown = $6, is_open = $7, updated_at = now()
            WHERE id = $1
            RETURNING {POSTING_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(input.title.trim())
        .bind(input.location.trim())
        .bind(input.employment_type)
        .bind(&input.description_markdown)
        .bind(input.is_open)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique("job posting slug"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a posting and its applications.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the posting does not exist.
    pub async fn delete(&self, id: JobPostingId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM site.job_posting WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Applications for one posting, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn applications(
        &self,
        id: JobPostingId,
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        let rows = sqlx::query_as::<_, JobApplicationRow>(
            r"
            SELECT id, job_posting_id, name, email, phone, resume_url, cover_letter, created_at
            FROM site.job_application
            WHERE job_posting_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

//! Quote request pipeline.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use keystone_core::{Email, QuoteRequestId, QuoteStatus};

use super::RepositoryError;
use crate::models::QuoteRequest;

#[derive(Debug, sqlx::FromRow)]
struct QuoteRequestRow {
    id: QuoteRequestId,
    name: String,
    email: String,
    phone: Option<String>,
    service: String,
    project_location: Option<String>,
    budget: Option<Decimal>,
    timeline: Option<String>,
    details: Option<String>,
    status: QuoteStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QuoteRequestRow> for QuoteRequest {
    type Error = RepositoryError;

    fn try_from(row: QuoteRequestRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            phone: row.phone,
            service: row.service,
            project_location: row.project_location,
            budget: row.budget,
            timeline: row.timeline,
            details: row.details,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const QUOTE_COLUMNS: &str = "id, name, email, phone, service, project_location, budget, \
                             timeline, details, status, created_at, updated_at";

pub struct QuoteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QuoteRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Quote requests, oldest first.
    ///
    /// With a status, only requests in that state. Without one, every request
    /// that is not closed (won, lost or archived).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list(
        &self,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<QuoteRequest>, RepositoryError> {
        let rows = sqlx::query_as::<_, QuoteRequestRow>(&format!(
            r"
            SELECT {QUOTE_COLUMNS}
            FROM site.quote_request
            WHERE $1::site.quote_status IS NULL OR status = $1
            ORDER BY created_at, id
            "
        ))
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .filter(|row| status.is_some() || !row.status.is_closed())
            .map(TryInto::try_into)
            .collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the request does not exist.
    pub async fn set_status(
        &self,
        id: QuoteRequestId,
        status: QuoteStatus,
    ) -> Result<QuoteRequest, RepositoryError> {
        let row = sqlx::query_as::<_, QuoteRequestRow>(&format!(
            r"
            UPDATE site.quote_request
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {QUOTE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}

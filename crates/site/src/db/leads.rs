//! Lead funnel writes: newsletter, quote requests, contact messages.

use sqlx::PgPool;

use keystone_core::{Email, MessageId, QuoteRequestId, QuoteStatus};

use super::RepositoryError;
use crate::models::{NewContactMessage, NewQuoteRequest, Subscription};

pub struct LeadRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeadRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a newsletter subscriber. Emails are unique; a repeat signup is
    /// reported as `AlreadySubscribed` and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn subscribe(
        &self,
        email: &Email,
        source: Option<&str>,
    ) -> Result<Subscription, RepositoryError> {
        let inserted = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO site.newsletter_subscriber (email, source)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
            ",
        )
        .bind(email)
        .bind(source)
        .fetch_optional(self.pool)
        .await?;

        Ok(if inserted.is_some() {
            Subscription::Subscribed
        } else {
            Subscription::AlreadySubscribed
        })
    }

    /// Store a quote request as pending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_quote_request(
        &self,
        request: &NewQuoteRequest,
    ) -> Result<QuoteRequestId, RepositoryError> {
        let id = sqlx::query_scalar::<_, QuoteRequestId>(
            r"
            INSERT INTO site.quote_request
                (name, email, phone, service, project_location, budget, timeline, details, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            ",
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.service)
        .bind(&request.project_location)
        .bind(request.budget)
        .bind(&request.timeline)
        .bind(&request.details)
        .bind(QuoteStatus::Pending)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// Store a contact message as unread.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_message(
        &self,
        message: &NewContactMessage,
    ) -> Result<MessageId, RepositoryError> {
        let id = sqlx::query_scalar::<_, MessageId>(
            r"
            INSERT INTO site.message (name, email, phone, subject, body, is_read)
            VALUES ($1, $2, $3, $4, $5, false)
            RETURNING id
            ",
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.subject)
        .bind(&message.body)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }
}

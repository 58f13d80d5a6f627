//! Contact-form inbox.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use keystone_core::{Email, MessageId};

use super::RepositoryError;
use crate::models::Message;

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: MessageId,
    name: String,
    email: String,
    phone: Option<String>,
    subject: Option<String>,
    body: String,
    is_read: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            phone: row.phone,
            subject: row.subject,
            body: row.body,
            is_read: row.is_read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Inbox, newest first. With `unread_only` only unread messages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list(&self, unread_only: bool) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r"
            SELECT id, name, email, phone, subject, body, is_read, created_at, updated_at
            FROM site.message
            WHERE NOT ($1 AND is_read)
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(unread_only)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message does not exist.
    pub async fn set_read(&self, id: MessageId, is_read: bool) -> Result<Message, RepositoryError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r"
            UPDATE site.message
            SET is_read = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, phone, subject, body, is_read, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(is_read)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message does not exist.
    pub async fn delete(&self, id: MessageId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM site.message WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

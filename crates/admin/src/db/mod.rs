//! Database operations for the back-office.
//!
//! # Schema: `site`
//!
//! Both binaries share one database. The admin reads and writes every table;
//! the public site only reads published content and inserts leads.
//!
//! ## Tables
//!
//! - `project` - Portfolio projects (`slug` unique)
//! - `gallery_image` - Project images. `display_order` is 1-based and dense per
//!   project, guarded by `UNIQUE (project_id, display_order) DEFERRABLE
//!   INITIALLY DEFERRED` so a whole gallery can be renumbered in one
//!   transaction. `project_id` cascades on delete.
//! - `blog_post` - Blog posts, `published_at IS NULL` for drafts
//! - `testimonial` - Client testimonials (`site.testimonial_status`)
//! - `quote_request` - Quote funnel leads (`site.quote_status`)
//! - `message` - Contact-form messages
//! - `newsletter_subscriber` - Newsletter list (`email` unique)
//! - `job_posting` - Careers page (`site.employment_type`)
//! - `job_application` - Applications, cascades with the posting
//!
//! Schema migrations are managed outside this workspace.

pub mod careers;
pub mod gallery;
pub mod messages;
pub mod posts;
pub mod projects;
pub mod quotes;
pub mod testimonials;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use careers::CareerRepository;
pub use gallery::GalleryRepository;
pub use messages::MessageRepository;
pub use posts::PostRepository;
pub use projects::ProjectRepository;
pub use quotes::QuoteRepository;
pub use testimonials::TestimonialRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(what: &'static str) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
        RepositoryError::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

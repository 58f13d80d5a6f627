//! Database access for the public site.
//!
//! # Schema: `site`
//!
//! The site reads what the back office publishes and writes only lead funnel
//! submissions:
//!
//! - reads `project`, `gallery_image`, `blog_post`, `testimonial` (approved),
//!   `job_posting` (open)
//! - writes `newsletter_subscriber`, `quote_request`, `contact_message`,
//!   `testimonial` (as pending), `job_application`
//!
//! Table definitions are listed in the admin crate's `db` module. The site
//! never runs migrations.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod careers;
pub mod leads;
pub mod posts;
pub mod projects;
pub mod testimonials;

pub use careers::CareerRepository;
pub use leads::LeadRepository;
pub use posts::PostRepository;
pub use projects::ProjectRepository;
pub use testimonials::TestimonialRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value violates an application rule.
    #[error("Data corruption: {0}")]
    DataCorruption(String),
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

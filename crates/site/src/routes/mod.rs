//! HTTP route handlers for the public site.
//!
//! # Route Structure
//!
//! ```text
//! # Content
//! GET  /api/services               - Service pages in display order
//! GET  /api/services/{slug}        - Service page
//! GET  /api/pages/{slug}           - Static page (about, warranty, privacy)
//!
//! # Portfolio and blog
//! GET  /api/projects               - Published projects with cover image
//! GET  /api/projects/{slug}        - Project with ordered gallery
//! GET  /api/blog                   - Published posts
//! GET  /api/blog/{slug}            - Post rendered to HTML
//! GET  /api/testimonials           - Approved testimonials
//! GET  /api/careers                - Open job postings
//! GET  /api/careers/{slug}         - Job posting
//!
//! # Submissions (form rate limit)
//! POST /api/testimonials           - Submit a testimonial (pending)
//! POST /api/careers/{slug}/apply   - Apply to a posting
//! POST /api/newsletter             - Newsletter signup
//! POST /api/quote                  - Quote request
//! POST /api/contact                - Contact message
//! ```

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::middleware::{api_rate_limiter, form_rate_limiter};
use crate::state::AppState;

pub mod blog;
pub mod careers;
pub mod content;
pub mod leads;
pub mod projects;
pub mod testimonials;

/// Body returned when a submission is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Submitted {
    pub id: i64,
}

impl Submitted {
    pub fn new(id: impl Into<i64>) -> Self {
        Self { id: id.into() }
    }
}

/// Read-only routes.
pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/api/services", get(content::services))
        .route("/api/services/{slug}", get(content::service))
        .route("/api/pages/{slug}", get(content::page))
        .route("/api/projects", get(projects::index))
        .route("/api/projects/{slug}", get(projects::show))
        .route("/api/blog", get(blog::index))
        .route("/api/blog/{slug}", get(blog::show))
        .route("/api/testimonials", get(testimonials::index))
        .route("/api/careers", get(careers::index))
        .route("/api/careers/{slug}", get(careers::show))
        .layer(api_rate_limiter())
}

/// Form submission routes, with a stricter per-IP limit.
pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/api/testimonials", post(testimonials::submit))
        .route("/api/careers/{slug}/apply", post(careers::apply))
        .route("/api/newsletter", post(leads::subscribe))
        .route("/api/quote", post(leads::quote))
        .route("/api/contact", post(leads::contact))
        .layer(form_rate_limiter())
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(read_routes())
        .merge(submission_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use keystone_core::QuoteRequestId;

    use super::*;

    #[test]
    fn test_submitted_json() {
        let body = serde_json::to_value(Submitted::new(QuoteRequestId::new(12))).unwrap();
        assert_eq!(body, serde_json::json!({ "id": 12 }));
    }
}

//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Notifications
//! GET    /api/admin/notifications                  - Badge counts
//!
//! # Projects and galleries
//! GET    /api/projects                             - Project listing
//! POST   /api/projects                             - Create project
//! GET    /api/projects/{id}                        - Project detail
//! PUT    /api/projects/{id}                        - Update project
//! DELETE /api/projects/{id}                        - Delete project and its files
//! GET    /api/projects/{id}/gallery                - Ordered gallery
//! PUT    /api/projects/{id}/gallery                - Save a client-reordered gallery
//! POST   /api/projects/{id}/gallery/reorder        - Apply a drag-end event
//! POST   /api/projects/{id}/gallery/images         - Upload images (multipart)
//! PUT    /api/projects/{id}/gallery/feature        - Set or clear the feature image
//! PATCH  /api/projects/{id}/gallery/{image_id}     - Update caption
//! DELETE /api/projects/{id}/gallery/{image_id}     - Remove image
//! POST   /api/uploads/cleanup                      - Delete orphaned provider files
//!
//! # Inbox
//! GET    /api/messages                             - Contact messages (?unread=true)
//! PATCH  /api/messages/{id}                        - Mark read or unread
//! DELETE /api/messages/{id}                        - Delete message
//! GET    /api/admin/testimonials/pending           - Moderation queue
//! GET    /api/admin/testimonials                   - All testimonials (?status=)
//! POST   /api/admin/testimonials/{id}/approve      - Approve
//! POST   /api/admin/testimonials/{id}/reject       - Reject
//! GET    /api/admin/quote/requests                 - Quote requests (?status=)
//! PATCH  /api/admin/quote/requests/{id}            - Update status
//!
//! # Content
//! GET    /api/posts, POST /api/posts               - Blog posts
//! GET    /api/posts/{id}, PUT, DELETE              - Blog post
//! GET    /api/careers, POST /api/careers           - Job postings
//! GET    /api/careers/{id}, PUT, DELETE            - Job posting
//! GET    /api/careers/{id}/applications            - Applications for a posting
//! ```
//!
//! Every route here sits behind the API token guard.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
};

use crate::middleware::require_api_token;
use crate::state::AppState;

pub mod careers;
pub mod gallery;
pub mod messages;
pub mod notifications;
pub mod posts;
pub mod projects;
pub mod quotes;
pub mod testimonials;
pub mod uploads;

/// Slack on top of the file bytes for multipart framing and captions.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the guarded `/api` router.
pub fn routes(state: &AppState) -> Router<AppState> {
    let upload_limit = state
        .config()
        .max_upload_bytes
        .saturating_mul(gallery::MAX_FILES_PER_REQUEST)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        // Notifications
        .route("/api/admin/notifications", get(notifications::counts))
        // Projects
        .route("/api/projects", get(projects::index).post(projects::create))
        .route(
            "/api/projects/{id}",
            get(projects::show)
                .put(projects::update)
                .delete(projects::destroy),
        )
        // Gallery
        .route(
            "/api/projects/{id}/gallery",
            get(gallery::show).put(gallery::replace),
        )
        .route("/api/projects/{id}/gallery/reorder", post(gallery::reorder))
        .route(
            "/api/projects/{id}/gallery/images",
            post(gallery::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/projects/{id}/gallery/feature", put(gallery::set_feature))
        .route(
            "/api/projects/{id}/gallery/{image_id}",
            patch(gallery::update_caption).delete(gallery::remove),
        )
        .route("/api/uploads/cleanup", post(uploads::cleanup))
        // Inbox
        .route("/api/messages", get(messages::index))
        .route(
            "/api/messages/{id}",
            patch(messages::update).delete(messages::destroy),
        )
        .route(
            "/api/admin/testimonials/pending",
            get(testimonials::pending),
        )
        .route("/api/admin/testimonials", get(testimonials::index))
        .route(
            "/api/admin/testimonials/{id}/approve",
            post(testimonials::approve),
        )
        .route(
            "/api/admin/testimonials/{id}/reject",
            post(testimonials::reject),
        )
        .route("/api/admin/quote/requests", get(quotes::index))
        .route("/api/admin/quote/requests/{id}", patch(quotes::update))
        // Blog
        .route("/api/posts", get(posts::index).post(posts::create))
        .route(
            "/api/posts/{id}",
            get(posts::show).put(posts::update).delete(posts::destroy),
        )
        // Careers
        .route("/api/careers", get(careers::index).post(careers::create))
        .route(
            "/api/careers/{id}",
            get(careers::show)
                .put(careers::update)
                .delete(careers::destroy),
        )
        .route("/api/careers/{id}/applications", get(careers::applications))
        .route_layer(from_fn_with_state(state.clone(), require_api_token))
}

//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS for the back-office SPA origin
//! 5. API token guard (`/api` routes only)

pub mod auth;
pub mod request_id;

pub use auth::{ApiToken, require_api_token};
pub use request_id::request_id_middleware;

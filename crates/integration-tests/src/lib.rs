//! Integration tests for the Keystone web platform.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p keystone-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `gallery_reorder` - Gallery rules driven through the public core API
//! - `notification_counts` - Aggregation and memoization
//! - `admin_api` - Admin router: health, token guard, request validation
//! - `site_api` - Site router: content pages, submission validation
//!
//! Router tests use a lazily connected pool. Every path they cover answers
//! before a query is issued, so no database is needed.

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use keystone_admin::config::{AdminConfig, UploadConfig};
use keystone_site::config::SiteConfig;
use keystone_site::content::ContentStore;

/// Token the admin test router accepts.
pub const ADMIN_TOKEN: &str = "kT9#vQ2!mZ7@pL4$wX8&nB3*rF6^yH1%";

/// Client IP sent with every site request; the rate limiters key on it.
pub const CLIENT_IP: &str = "203.0.113.7";

const DATABASE_URL: &str = "postgres://keystone@127.0.0.1:5999/keystone_test";

/// A pool that never connects until a query runs.
///
/// # Panics
///
/// Panics if the hard-coded URL fails to parse.
#[must_use]
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy(DATABASE_URL)
        .expect("valid database URL")
}

#[must_use]
pub fn admin_config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from(DATABASE_URL),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        api_token: SecretString::from(ADMIN_TOKEN),
        cors_origin: Some("http://localhost:5173".to_string()),
        uploads: UploadConfig {
            api_url: url::Url::parse("http://127.0.0.1:9/v6").expect("valid URL"),
            api_key: SecretString::from("sk_test_q8Vn2Lr5Tz"),
        },
        max_upload_bytes: 1024 * 1024,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

#[must_use]
pub fn site_config(content_dir: &Path) -> SiteConfig {
    SiteConfig {
        database_url: SecretString::from(DATABASE_URL),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        content_dir: content_dir.to_path_buf(),
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The admin router as the binary serves it, minus Sentry.
///
/// # Panics
///
/// Panics if the application state cannot be built.
#[must_use]
pub fn admin_app() -> Router {
    // reqwest builds a rustls client for the upload provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let state = keystone_admin::state::AppState::new(admin_config(), lazy_pool())
        .expect("admin state");
    keystone_admin::app(state)
}

/// The site router over the content in `content_dir`.
///
/// # Panics
///
/// Panics if the content cannot be loaded.
#[must_use]
pub fn site_app(content_dir: &Path) -> Router {
    let config = site_config(content_dir);
    let content = ContentStore::load(content_dir).expect("content loads");
    let state =
        keystone_site::state::AppState::new(config, lazy_pool(), content).expect("site state");
    keystone_site::app(state)
}

/// A site request carrying the client IP header.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
pub fn site_request(method: &str, uri: &str, json: Option<&serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", CLIENT_IP);
    match json {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request")
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

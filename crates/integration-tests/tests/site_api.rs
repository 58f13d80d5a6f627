//! Site router: markdown content and submission validation.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use axum::http::StatusCode;
use tower::ServiceExt;

use keystone_integration_tests::{json_body, site_app, site_request};

fn content_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("services"),
        "roofing.md",
        "---\ntitle: Roofing\nsummary: New roofs and repairs\norder: 2\n---\nWe **fix** roofs.",
    );
    write(
        &dir.path().join("services"),
        "kitchen-remodels.md",
        "---\ntitle: Kitchen Remodels\nsummary: Full renovations\norder: 1\n---\nKitchens.",
    );
    write(
        &dir.path().join("pages"),
        "about.md",
        "---\ntitle: About\ndescription: Who we are\n---\nFamily owned.",
    );
    dir
}

fn write(dir: &Path, name: &str, body: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), body).unwrap();
}

#[tokio::test]
async fn test_health() {
    let dir = content_dir();
    let response = site_app(dir.path())
        .oneshot(site_request("GET", "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_services_in_display_order() {
    let dir = content_dir();
    let response = site_app(dir.path())
        .oneshot(site_request("GET", "/api/services", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let slugs: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, ["kitchen-remodels", "roofing"]);
}

#[tokio::test]
async fn test_service_page_rendered() {
    let dir = content_dir();
    let response = site_app(dir.path())
        .oneshot(site_request("GET", "/api/services/roofing", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["title"], "Roofing");
    assert!(body["content_html"].as_str().unwrap().contains("<strong>fix</strong>"));
}

#[tokio::test]
async fn test_unknown_page_is_not_found() {
    let dir = content_dir();
    let app = site_app(dir.path());

    let response = app
        .clone()
        .oneshot(site_request("GET", "/api/pages/about", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(site_request("GET", "/api/pages/missing", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_invalid_slug_skips_the_database() {
    let dir = content_dir();
    let response = site_app(dir.path())
        .oneshot(site_request("GET", "/api/projects/Bad_Slug", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_newsletter_rejects_bad_email() {
    let dir = content_dir();
    let response = site_app(dir.path())
        .oneshot(site_request(
            "POST",
            "/api/newsletter",
            Some(&serde_json::json!({ "email": "not-an-email" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_requires_details() {
    let dir = content_dir();
    let response = site_app(dir.path())
        .oneshot(site_request(
            "POST",
            "/api/quote",
            Some(&serde_json::json!({
                "name": "Dana",
                "email": "dana@example.com",
                "service": "Deck",
                "details": "   ",
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("details"));
}

#[tokio::test]
async fn test_testimonial_rating_out_of_range() {
    let dir = content_dir();
    let response = site_app(dir.path())
        .oneshot(site_request(
            "POST",
            "/api/testimonials",
            Some(&serde_json::json!({
                "author_name": "Pat",
                "quote": "Great crew.",
                "rating": 6,
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_form_rate_limit() {
    let dir = content_dir();
    let app = site_app(dir.path());
    let bad = serde_json::json!({ "name": "", "email": "x", "body": "" });

    let mut statuses = Vec::new();
    for _ in 0..4 {
        let response = app
            .clone()
            .oneshot(site_request("POST", "/api/contact", Some(&bad)))
            .await
            .unwrap();
        statuses.push(response.status());
    }

    assert_eq!(&statuses[..3], [StatusCode::BAD_REQUEST; 3]);
    assert_eq!(statuses[3], StatusCode::TOO_MANY_REQUESTS);
}

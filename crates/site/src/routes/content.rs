//! Service and static pages from the markdown content store.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::content::{Page, Service, is_valid_slug};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /api/services`
#[instrument(skip(state))]
pub async fn services(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.content().services().to_vec())
}

/// `GET /api/services/{slug}`
#[instrument(skip(state))]
pub async fn service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Service>> {
    state
        .content()
        .get_service(&slug)
        .filter(|_| is_valid_slug(&slug))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("service {slug}")))
}

/// `GET /api/pages/{slug}`
#[instrument(skip(state))]
pub async fn page(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Page>> {
    state
        .content()
        .get_page(&slug)
        .filter(|_| is_valid_slug(&slug))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))
}

//! Testimonial moderation.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use keystone_core::{TestimonialId, TestimonialStatus};

use crate::db::TestimonialRepository;
use crate::error::Result;
use crate::models::Testimonial;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TestimonialQuery {
    pub status: Option<TestimonialStatus>,
}

/// `GET /api/admin/testimonials/pending`
#[instrument(skip(state))]
pub async fn pending(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>> {
    let testimonials = TestimonialRepository::new(state.pool())
        .list(Some(TestimonialStatus::Pending))
        .await?;
    Ok(Json(testimonials))
}

/// `GET /api/admin/testimonials?status=approved`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<TestimonialQuery>,
) -> Result<Json<Vec<Testimonial>>> {
    let testimonials = TestimonialRepository::new(state.pool())
        .list(query.status)
        .await?;
    Ok(Json(testimonials))
}

async fn moderate(
    state: &AppState,
    id: TestimonialId,
    status: TestimonialStatus,
) -> Result<Json<Testimonial>> {
    let testimonial = TestimonialRepository::new(state.pool())
        .set_status(id, status)
        .await?;
    tracing::info!(testimonial_id = %id, ?status, "Testimonial moderated");
    Ok(Json(testimonial))
}

/// `POST /api/admin/testimonials/{id}/approve`
#[instrument(skip(state))]
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
) -> Result<Json<Testimonial>> {
    moderate(&state, id, TestimonialStatus::Approved).await
}

/// `POST /api/admin/testimonials/{id}/reject`
#[instrument(skip(state))]
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
) -> Result<Json<Testimonial>> {
    moderate(&state, id, TestimonialStatus::Rejected).await
}

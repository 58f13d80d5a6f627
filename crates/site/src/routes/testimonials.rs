//! Approved testimonials and new submissions.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::cache::{CacheKey, CacheValue};
use crate::db::TestimonialRepository;
use crate::error::{AppError, Result};
use crate::models::{Testimonial, TestimonialInput};
use crate::routes::Submitted;
use crate::state::AppState;

/// `GET /api/testimonials`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>> {
    if let Some(CacheValue::Testimonials(list)) = state.cache().get(&CacheKey::Testimonials).await
    {
        return Ok(Json(list));
    }

    let list = TestimonialRepository::new(state.pool()).list_approved().await?;
    state
        .cache()
        .insert(CacheKey::Testimonials, CacheValue::Testimonials(list.clone()))
        .await;
    Ok(Json(list))
}

/// `POST /api/testimonials`
///
/// Lands as pending; it shows on the site once approved in the back office.
#[instrument(skip(state, input))]
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<TestimonialInput>,
) -> Result<(StatusCode, Json<Submitted>)> {
    let testimonial = input.validate().map_err(AppError::BadRequest)?;
    let id = TestimonialRepository::new(state.pool())
        .submit(&testimonial)
        .await?;

    tracing::info!(testimonial_id = %id, "Testimonial submitted");
    Ok((StatusCode::CREATED, Json(Submitted::new(id))))
}

//! Open job postings and applications.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::cache::{CacheKey, CacheValue};
use crate::content::{is_valid_slug, render_markdown};
use crate::db::CareerRepository;
use crate::error::{AppError, Result};
use crate::models::{JobApplicationInput, JobPostingDetail, JobPostingSummary};
use crate::routes::Submitted;
use crate::state::AppState;

/// `GET /api/careers`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<JobPostingSummary>>> {
    if let Some(CacheValue::Careers(postings)) = state.cache().get(&CacheKey::Careers).await {
        return Ok(Json(postings));
    }

    let postings = CareerRepository::new(state.pool()).list_open().await?;
    state
        .cache()
        .insert(CacheKey::Careers, CacheValue::Careers(postings.clone()))
        .await;
    Ok(Json(postings))
}

/// `GET /api/careers/{slug}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<JobPostingDetail>> {
    if !is_valid_slug(&slug) {
        return Err(AppError::NotFound(format!("job posting {slug}")));
    }

    let key = CacheKey::Career(slug.clone());
    if let Some(CacheValue::Career(posting)) = state.cache().get(&key).await {
        return Ok(Json(*posting));
    }

    let (posting, description_markdown) = CareerRepository::new(state.pool())
        .get_open(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job posting {slug}")))?;

    let detail = JobPostingDetail {
        posting,
        description_html: render_markdown(&description_markdown),
    };

    state
        .cache()
        .insert(key, CacheValue::Career(Box::new(detail.clone())))
        .await;
    Ok(Json(detail))
}

/// `POST /api/careers/{slug}/apply`
///
/// Applications are only accepted while the posting is open.
#[instrument(skip(state, input))]
pub async fn apply(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<JobApplicationInput>,
) -> Result<(StatusCode, Json<Submitted>)> {
    if !is_valid_slug(&slug) {
        return Err(AppError::NotFound(format!("job posting {slug}")));
    }
    let application = input.validate().map_err(AppError::BadRequest)?;

    let id = CareerRepository::new(state.pool())
        .apply(&slug, &application)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job posting {slug}")))?;

    tracing::info!(application_id = %id, posting = %slug, "Job application received");
    Ok((StatusCode::CREATED, Json(Submitted::new(id))))
}

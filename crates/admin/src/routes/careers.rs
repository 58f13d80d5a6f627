//! Job postings and the applications they receive.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use keystone_core::JobPostingId;

use crate::db::CareerRepository;
use crate::error::{AppError, Result};
use crate::models::{JobApplication, JobPosting, JobPostingInput};
use crate::state::AppState;

/// `GET /api/careers`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<JobPosting>>> {
    Ok(Json(CareerRepository::new(state.pool()).list().await?))
}

/// `GET /api/careers/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<JobPostingId>,
) -> Result<Json<JobPosting>> {
    CareerRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("job posting {id}")))
}

/// `POST /api/careers`
#[instrument(skip(state, input), fields(slug = %input.slug))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<JobPostingInput>,
) -> Result<(StatusCode, Json<JobPosting>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let posting = CareerRepository::new(state.pool()).create(&input).await?;
    tracing::info!(job_posting_id = %posting.id, "Job posting created");
    Ok((StatusCode::CREATED, Json(posting)))
}

/// `PUT /api/careers/{id}`
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<JobPostingId>,
    Json(input): Json<JobPostingInput>,
) -> Result<Json<JobPosting>> {
    input.validate().map_err(AppError::BadRequest)?;
    Ok(Json(
        CareerRepository::new(state.pool()).update(id, &input).await?,
    ))
}

/// `DELETE /api/careers/{id}`
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<JobPostingId>,
) -> Result<StatusCode> {
    CareerRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/careers/{id}/applications`
#[instrument(skip(state))]
pub async fn applications(
    State(state): State<AppState>,
    Path(id): Path<JobPostingId>,
) -> Result<Json<Vec<JobApplication>>> {
    let repo = CareerRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound(format!("job posting {id}")));
    }
    Ok(Json(repo.applications(id).await?))
}

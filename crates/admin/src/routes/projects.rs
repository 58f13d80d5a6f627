//! Project CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use keystone_core::ProjectId;

use crate::db::{GalleryRepository, ProjectRepository};
use crate::error::{AppError, Result};
use crate::models::{Project, ProjectInput};
use crate::state::AppState;

/// `GET /api/projects`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Project>>> {
    let projects = ProjectRepository::new(state.pool()).list().await?;
    Ok(Json(projects))
}

/// `GET /api/projects/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<Project>> {
    ProjectRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("project {id}")))
}

/// `POST /api/projects`
#[instrument(skip(state, input), fields(slug = %input.slug))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let project = ProjectRepository::new(state.pool()).create(&input).await?;

    tracing::info!(project_id = %project.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// `PUT /api/projects/{id}`
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Project>> {
    input.validate().map_err(AppError::BadRequest)?;
    let project = ProjectRepository::new(state.pool())
        .update(id, &input)
        .await?;
    Ok(Json(project))
}

/// `DELETE /api/projects/{id}`
///
/// Gallery rows go with the project; their files are then removed from the
/// upload provider.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<StatusCode> {
    let file_keys = GalleryRepository::new(state.pool())
        .load(id)
        .await?
        .file_keys();

    ProjectRepository::new(state.pool()).delete(id).await?;
    state.uploads().delete_quietly(&file_keys).await;

    tracing::info!(project_id = %id, files = file_keys.len(), "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

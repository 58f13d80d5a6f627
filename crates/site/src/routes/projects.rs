//! Published portfolio projects.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::cache::{CacheKey, CacheValue};
use crate::content::is_valid_slug;
use crate::db::ProjectRepository;
use crate::error::{AppError, Result};
use crate::models::{ProjectDetail, ProjectSummary};
use crate::state::AppState;

/// `GET /api/projects`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProjectSummary>>> {
    if let Some(CacheValue::Projects(projects)) = state.cache().get(&CacheKey::Projects).await {
        return Ok(Json(projects));
    }

    let projects = ProjectRepository::new(state.pool()).list_published().await?;
    state
        .cache()
        .insert(CacheKey::Projects, CacheValue::Projects(projects.clone()))
        .await;
    Ok(Json(projects))
}

/// `GET /api/projects/{slug}`
///
/// The gallery comes back in display order with at most one feature image.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProjectDetail>> {
    if !is_valid_slug(&slug) {
        return Err(AppError::NotFound(format!("project {slug}")));
    }

    let key = CacheKey::Project(slug.clone());
    if let Some(CacheValue::Project(project)) = state.cache().get(&key).await {
        return Ok(Json(*project));
    }

    let project = ProjectRepository::new(state.pool())
        .get_published(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("project {slug}")))?;

    state
        .cache()
        .insert(key, CacheValue::Project(Box::new(project.clone())))
        .await;
    Ok(Json(project))
}

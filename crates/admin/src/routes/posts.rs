//! Blog post CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use keystone_core::BlogPostId;

use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::models::{BlogPost, BlogPostInput};
use crate::state::AppState;

/// `GET /api/posts`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>> {
    Ok(Json(PostRepository::new(state.pool()).list().await?))
}

/// `GET /api/posts/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<BlogPostId>,
) -> Result<Json<BlogPost>> {
    PostRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))
}

/// `POST /api/posts`
#[instrument(skip(state, input), fields(slug = %input.slug))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<BlogPostInput>,
) -> Result<(StatusCode, Json<BlogPost>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let post = PostRepository::new(state.pool()).create(&input).await?;
    tracing::info!(post_id = %post.id, "Post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// `PUT /api/posts/{id}`
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<BlogPostId>,
    Json(input): Json<BlogPostInput>,
) -> Result<Json<BlogPost>> {
    input.validate().map_err(AppError::BadRequest)?;
    Ok(Json(PostRepository::new(state.pool()).update(id, &input).await?))
}

/// `DELETE /api/posts/{id}`
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<BlogPostId>,
) -> Result<StatusCode> {
    PostRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Published blog posts.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::cache::{CacheKey, CacheValue};
use crate::content::{is_valid_slug, reading_time_minutes, render_markdown};
use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::models::{PostDetail, PostSummary};
use crate::state::AppState;

/// `GET /api/blog`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<PostSummary>>> {
    if let Some(CacheValue::Posts(posts)) = state.cache().get(&CacheKey::Posts).await {
        return Ok(Json(posts));
    }

    let posts = PostRepository::new(state.pool()).list_published().await?;
    state
        .cache()
        .insert(CacheKey::Posts, CacheValue::Posts(posts.clone()))
        .await;
    Ok(Json(posts))
}

/// `GET /api/blog/{slug}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>> {
    if !is_valid_slug(&slug) {
        return Err(AppError::NotFound(format!("post {slug}")));
    }

    let key = CacheKey::Post(slug.clone());
    if let Some(CacheValue::Post(post)) = state.cache().get(&key).await {
        return Ok(Json(*post));
    }

    let (post, body_markdown) = PostRepository::new(state.pool())
        .get_published(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {slug}")))?;

    let detail = PostDetail {
        post,
        body_html: render_markdown(&body_markdown),
        reading_time_minutes: reading_time_minutes(&body_markdown),
    };

    state
        .cache()
        .insert(key, CacheValue::Post(Box::new(detail.clone())))
        .await;
    Ok(Json(detail))
}

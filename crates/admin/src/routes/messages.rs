//! Contact form inbox.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use keystone_core::MessageId;

use crate::db::MessageRepository;
use crate::error::Result;
use crate::models::Message;
use crate::models::inbox::MessageUpdate;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    #[serde(default)]
    pub unread: bool,
}

/// `GET /api/messages?unread=true`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<Message>>> {
    let messages = MessageRepository::new(state.pool())
        .list(query.unread)
        .await?;
    Ok(Json(messages))
}

/// `PATCH /api/messages/{id}`
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<MessageId>,
    Json(update): Json<MessageUpdate>,
) -> Result<Json<Message>> {
    let message = MessageRepository::new(state.pool())
        .set_read(id, update.is_read)
        .await?;
    Ok(Json(message))
}

/// `DELETE /api/messages/{id}`
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<MessageId>,
) -> Result<StatusCode> {
    MessageRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

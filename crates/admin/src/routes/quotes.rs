//! Quote request pipeline.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use keystone_core::{QuoteRequestId, QuoteStatus};

use crate::db::QuoteRepository;
use crate::error::Result;
use crate::models::QuoteRequest;
use crate::models::inbox::QuoteStatusUpdate;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct QuoteQuery {
    /// Without a status, closed requests are hidden.
    pub status: Option<QuoteStatus>,
}

/// `GET /api/admin/quote/requests?status=pending`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<Vec<QuoteRequest>>> {
    let requests = QuoteRepository::new(state.pool())
        .list(query.status)
        .await?;
    Ok(Json(requests))
}

/// `PATCH /api/admin/quote/requests/{id}`
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<QuoteRequestId>,
    Json(update): Json<QuoteStatusUpdate>,
) -> Result<Json<QuoteRequest>> {
    let request = QuoteRepository::new(state.pool())
        .set_status(id, update.status)
        .await?;
    tracing::info!(quote_request_id = %id, status = ?update.status, "Quote request updated");
    Ok(Json(request))
}

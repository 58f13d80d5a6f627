//! Lead funnel: newsletter signups, quote requests and contact messages.
//!
//! Quote requests and contact messages are announced to staff by email when
//! SMTP is configured. The notification runs on its own task after the lead
//! is stored.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use crate::db::LeadRepository;
use crate::error::{AppError, Result};
use crate::models::{ContactInput, NewsletterSignup, QuoteRequestInput, Subscription};
use crate::routes::Submitted;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub status: Subscription,
}

/// `POST /api/newsletter`
///
/// Idempotent: a repeat signup answers `already_subscribed` with 200.
#[instrument(skip(state, signup))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(signup): Json<NewsletterSignup>,
) -> Result<Json<SubscribeResponse>> {
    let (email, source) = signup.validate().map_err(AppError::BadRequest)?;
    let status = LeadRepository::new(state.pool())
        .subscribe(&email, source.as_deref())
        .await?;

    tracing::info!(?status, source = source.as_deref().unwrap_or("-"), "Newsletter signup");
    Ok(Json(SubscribeResponse { status }))
}

/// `POST /api/quote`
#[instrument(skip(state, input))]
pub async fn quote(
    State(state): State<AppState>,
    Json(input): Json<QuoteRequestInput>,
) -> Result<(StatusCode, Json<Submitted>)> {
    let request = input.validate().map_err(AppError::BadRequest)?;
    let id = LeadRepository::new(state.pool())
        .create_quote_request(&request)
        .await?;
    tracing::info!(quote_request_id = %id, service = %request.service, "Quote request received");

    if let Some(email) = state.email().cloned() {
        tokio::spawn(async move {
            if let Err(e) = email.notify_quote_request(id, &request).await {
                tracing::warn!(error = %e, quote_request_id = %id, "Failed to send quote notification");
            }
        });
    }

    Ok((StatusCode::CREATED, Json(Submitted::new(id))))
}

/// `POST /api/contact`
#[instrument(skip(state, input))]
pub async fn contact(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> Result<(StatusCode, Json<Submitted>)> {
    let message = input.validate().map_err(AppError::BadRequest)?;
    let id = LeadRepository::new(state.pool())
        .create_message(&message)
        .await?;
    tracing::info!(message_id = %id, "Contact message received");

    if let Some(email) = state.email().cloned() {
        tokio::spawn(async move {
            if let Err(e) = email.notify_contact_message(id, &message).await {
                tracing::warn!(error = %e, message_id = %id, "Failed to send contact notification");
            }
        });
    }

    Ok((StatusCode::CREATED, Json(Submitted::new(id))))
}

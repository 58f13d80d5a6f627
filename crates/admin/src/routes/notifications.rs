//! Back-office notification badge.

use axum::{Json, extract::State};
use tracing::instrument;

use keystone_core::notifications::NotificationCounts;
use keystone_core::{QuoteStatus, TestimonialStatus};

use crate::db::{MessageRepository, QuoteRepository, TestimonialRepository};
use crate::error::Result;
use crate::state::AppState;

/// `GET /api/admin/notifications`
///
/// Unread messages, pending testimonials and pending quote requests. The
/// three collections are fetched concurrently; the total is only recomputed
/// when one of them changed since the last request.
#[instrument(skip(state))]
pub async fn counts(State(state): State<AppState>) -> Result<Json<NotificationCounts>> {
    let pool = state.pool();
    let messages = MessageRepository::new(pool);
    let testimonials = TestimonialRepository::new(pool);
    let quotes = QuoteRepository::new(pool);

    let (messages, testimonials, quotes) = tokio::try_join!(
        messages.list(true),
        testimonials.list(Some(TestimonialStatus::Pending)),
        quotes.list(Some(QuoteStatus::Pending)),
    )?;

    let counts = state.notification_counts(&messages, &testimonials, &quotes);
    tracing::debug!(total = counts.total(), "Notification counts");
    Ok(Json(counts))
}

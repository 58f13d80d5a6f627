//! Application state shared across handlers.

use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use sqlx::PgPool;

use keystone_core::notifications::{
    AwaitingReview, NotificationAggregator, NotificationCounts, Unread,
};

use crate::config::AdminConfig;
use crate::middleware::ApiToken;
use crate::services::{UploadClient, UploadError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    uploads: UploadClient,
    api_token: ApiToken,
    notifications: Mutex<NotificationAggregator>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload client cannot be built.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, UploadError> {
        let uploads = UploadClient::new(&config.uploads)?;
        let api_token = ApiToken::new(&config.api_token);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                uploads,
                api_token,
                notifications: Mutex::new(NotificationAggregator::new()),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn uploads(&self) -> &UploadClient {
        &self.inner.uploads
    }

    #[must_use]
    pub fn api_token(&self) -> &ApiToken {
        &self.inner.api_token
    }

    /// Notification counts through the shared memo.
    ///
    /// The lock is held only for the synchronous recompute. A poisoned lock
    /// still holds a consistent memo, so it is recovered.
    pub fn notification_counts<M, T, Q>(
        &self,
        messages: &[M],
        testimonials: &[T],
        quotes: &[Q],
    ) -> NotificationCounts
    where
        M: Unread + Hash,
        T: AwaitingReview + Hash,
        Q: AwaitingReview + Hash,
    {
        let mut aggregator = self
            .inner
            .notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        aggregator.counts(messages, testimonials, quotes)
    }
}

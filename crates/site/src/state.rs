//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::ListingCache;
use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::services::{EmailError, EmailService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    content: ContentStore,
    cache: ListingCache,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if SMTP is configured but the transport cannot be
    /// built.
    pub fn new(
        config: SiteConfig,
        pool: PgPool,
        content: ContentStore,
    ) -> Result<Self, EmailError> {
        let email = config.email.as_ref().map(EmailService::new).transpose()?;
        if email.is_none() {
            tracing::info!("SMTP not configured, lead notifications disabled");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                content,
                cache: ListingCache::new(),
                email,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    #[must_use]
    pub fn cache(&self) -> &ListingCache {
        &self.inner.cache
    }

    /// Lead notifier, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}

//! In-memory cache for published listings (`moka`, 5-minute TTL).
//!
//! Only reads are cached. Admin edits show up on the site once the entry
//! expires.

use std::time::Duration;

use moka::future::Cache;

use crate::models::{
    JobPostingDetail, JobPostingSummary, PostDetail, PostSummary, ProjectDetail, ProjectSummary,
    Testimonial,
};

const MAX_ENTRIES: u64 = 1000;
const TIME_TO_LIVE: Duration = Duration::from_secs(300);

/// Cache key for listings and detail pages.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Projects,
    Project(String),
    Posts,
    Post(String),
    Testimonials,
    Careers,
    Career(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Projects(Vec<ProjectSummary>),
    Project(Box<ProjectDetail>),
    Posts(Vec<PostSummary>),
    Post(Box<PostDetail>),
    Testimonials(Vec<Testimonial>),
    Careers(Vec<JobPostingSummary>),
    Career(Box<JobPostingDetail>),
}

/// Shared handle to the listing cache.
#[derive(Clone)]
pub struct ListingCache {
    inner: Cache<CacheKey, CacheValue>,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(TIME_TO_LIVE)
                .build(),
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        let value = self.inner.get(key).await;
        if value.is_some() {
            tracing::debug!(?key, "Cache hit");
        }
        value
    }

    pub async fn insert(&self, key: CacheKey, value: CacheValue) {
        self.inner.insert(key, value).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_round_trip() {
        let cache = ListingCache::new();
        assert!(cache.get(&CacheKey::Testimonials).await.is_none());

        cache
            .insert(CacheKey::Testimonials, CacheValue::Testimonials(Vec::new()))
            .await;

        assert!(matches!(
            cache.get(&CacheKey::Testimonials).await,
            Some(CacheValue::Testimonials(list)) if list.is_empty()
        ));
        assert!(cache.get(&CacheKey::Project("deck".into())).await.is_none());
    }
}

//! Caching layer for GitHub profile lookups.
//!
//! Profiles are cached per (lowercased) username for 24 hours. A missing
//! profile is cached too; source errors are not.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use super::{GithubProfile, GithubSource, SourceError};

const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_CAPACITY: u64 = 1_000;

/// A [`GithubSource`] that remembers recent lookups.
pub struct CachedGithubSource {
    inner: Arc<dyn GithubSource>,
    cache: Cache<String, Option<GithubProfile>>,
}

impl CachedGithubSource {
    pub fn new(inner: Arc<dyn GithubSource>) -> Self {
        Self::with_settings(inner, DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    pub fn with_settings(inner: Arc<dyn GithubSource>, max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl GithubSource for CachedGithubSource {
    async fn profile(&self, username: &str) -> Result<Option<GithubProfile>, SourceError> {
        let key = username.to_lowercase();

        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(username = %key, "github cache hit");
            return Ok(cached);
        }

        let profile = self.inner.profile(&key).await?;
        self.cache.insert(key, profile.clone()).await;
        Ok(profile)
    }
}

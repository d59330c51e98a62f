//! Process-wide cache for identity-provider management tokens.
//!
//! Entries expire after the configured TTL and are refreshed lazily on the next
//! lookup. Concurrent misses for the same key each call the token source; the
//! last insert wins.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::CacheConfig;
use crate::error::AppResult;

/// Issues fresh management tokens, typically by calling the identity provider.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ManagementTokenSource: Send + Sync {
    /// Request a new token for the given audience
    async fn fetch_token(&self, audience: &str) -> AppResult<String>;
}

/// TTL cache in front of a [`ManagementTokenSource`], one live token per audience.
#[derive(Clone)]
pub struct ManagementTokenCache {
    source: Arc<dyn ManagementTokenSource>,
    tokens: Cache<String, String>,
}

impl ManagementTokenCache {
    pub fn new(source: Arc<dyn ManagementTokenSource>, config: &CacheConfig) -> Self {
        Self::with_ttl(
            source,
            Duration::from_secs(config.ttl_seconds),
            config.max_entries,
        )
    }

    pub fn with_ttl(
        source: Arc<dyn ManagementTokenSource>,
        ttl: Duration,
        max_entries: u64,
    ) -> Self {
        let tokens = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { source, tokens }
    }

    /// Cached token for `audience`, fetching a new one when missing or expired
    pub async fn token(&self, audience: &str) -> AppResult<String> {
        if let Some(token) = self.tokens.get(audience).await {
            return Ok(token);
        }

        tracing::debug!(audience, "Management token cache miss, refreshing");
        let token = self.source.fetch_token(audience).await.map_err(|e| {
            tracing::error!(audience, error = %e, "Failed to refresh management token");
            e
        })?;
        self.tokens
            .insert(audience.to_string(), token.clone())
            .await;

        Ok(token)
    }

    /// Drop the cached token, e.g. after the provider rejected it
    pub async fn invalidate(&self, audience: &str) {
        self.tokens.invalidate(audience).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use mockall::predicate::eq;

    const AUDIENCE: &str = "https://tenant.example.com/api/v2/";

    fn cache_with(source: MockManagementTokenSource, ttl: Duration) -> ManagementTokenCache {
        ManagementTokenCache::with_ttl(Arc::new(source), ttl, 16)
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let mut source = MockManagementTokenSource::new();
        source
            .expect_fetch_token()
            .with(eq(AUDIENCE))
            .times(1)
            .returning(|_| Ok("token-1".to_string()));

        let cache = cache_with(source, Duration::from_secs(60));

        assert_eq!(cache.token(AUDIENCE).await.unwrap(), "token-1");
        assert_eq!(cache.token(AUDIENCE).await.unwrap(), "token-1");
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        let mut source = MockManagementTokenSource::new();
        let mut issued = 0;
        source.expect_fetch_token().times(2).returning(move |_| {
            issued += 1;
            Ok(format!("token-{}", issued))
        });

        let cache = cache_with(source, Duration::from_millis(200));

        assert_eq!(cache.token(AUDIENCE).await.unwrap(), "token-1");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(cache.token(AUDIENCE).await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let mut source = MockManagementTokenSource::new();
        source
            .expect_fetch_token()
            .times(2)
            .returning(|_| Ok("token".to_string()));

        let cache = cache_with(source, Duration::from_secs(60));

        cache.token(AUDIENCE).await.unwrap();
        cache.invalidate(AUDIENCE).await;
        cache.token(AUDIENCE).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_refresh_is_not_cached() {
        let mut source = MockManagementTokenSource::new();
        let mut calls = 0;
        source.expect_fetch_token().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(AppError::identity_provider("timeout"))
            } else {
                Ok("token".to_string())
            }
        });

        let cache = cache_with(source, Duration::from_secs(60));

        let err = cache.token(AUDIENCE).await.unwrap_err();
        assert_eq!(err.code(), "IDENTITY_PROVIDER_ERROR");
        assert_eq!(cache.token(AUDIENCE).await.unwrap(), "token");
    }
}

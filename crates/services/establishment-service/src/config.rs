//! Establishment service configuration.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use common::{CacheConfig, DatabaseConfig, ManagementTokenCache, ManagementTokenSource};

/// Establishment service configuration.
#[derive(Debug, Clone, Default)]
pub struct EstablishmentServiceConfig {
    pub database: DatabaseConfig,
    /// Lifetime of cached identity-provider management tokens
    pub token_cache: CacheConfig,
}

impl EstablishmentServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database: DatabaseConfig {
                url: env::var("ESTABLISHMENT_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.database.max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(defaults.database.min_connections),
                sql_logging: parse_var("DATABASE_SQL_LOGGING")
                    .unwrap_or(defaults.database.sql_logging),
            },
            token_cache: CacheConfig {
                ttl_seconds: parse_var("MANAGEMENT_TOKEN_TTL_SECONDS")
                    .unwrap_or(defaults.token_cache.ttl_seconds),
                ..defaults.token_cache
            },
        }
    }

    /// Process-wide token cache for the identity-provider client
    pub fn management_token_cache(
        &self,
        source: Arc<dyn ManagementTokenSource>,
    ) -> ManagementTokenCache {
        ManagementTokenCache::new(source, &self.token_cache)
    }
}

/// Unset or unparsable values fall back to the default
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

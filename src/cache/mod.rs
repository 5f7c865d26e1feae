//! Redis-backed cache for finished feed envelopes.
//!
//! The cache key encodes the full request shape (user, page, limit, cursor),
//! so a hit short-circuits the entire ranking pipeline and returns the stored
//! envelope verbatim. Entries expire by TTL only; there is no event-driven
//! invalidation, so the staleness window equals the TTL.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::FeedResponse;

/// Narrow get/set capability the ranking pipeline depends on.
#[async_trait]
pub trait FeedCacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<FeedResponse>>;
    async fn set(&self, key: &str, value: &FeedResponse, ttl_secs: u64) -> Result<()>;
}

/// Build the cache key for one feed request shape.
///
/// `start` stands in for an absent cursor so first-page and cursored
/// requests never collide.
pub fn feed_cache_key(external_id: &str, page: u32, limit: u32, cursor: Option<Uuid>) -> String {
    match cursor {
        Some(cursor) => format!("feed:{}:{}:{}:{}", external_id, page, limit, cursor),
        None => format!("feed:{}:{}:{}:start", external_id, page, limit),
    }
}

/// Production cache implementation over a shared Redis connection manager.
#[derive(Clone)]
pub struct RedisFeedCache {
    redis: ConnectionManager,
}

impl RedisFeedCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl FeedCacheStore for RedisFeedCache {
    async fn get(&self, key: &str) -> Result<Option<FeedResponse>> {
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(data)) => {
                debug!("Feed cache HIT for {}", key);
                serde_json::from_str::<FeedResponse>(&data)
                    .map(Some)
                    .map_err(|e| {
                        error!("Failed to deserialize cached feed: {}", e);
                        AppError::Cache(format!("Cache deserialization error: {}", e))
                    })
            }
            Ok(None) => {
                debug!("Feed cache MISS for {}", key);
                Ok(None)
            }
            Err(e) => Err(AppError::Cache(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &FeedResponse, ttl_secs: u64) -> Result<()> {
        let data = serde_json::to_string(value).map_err(|e| {
            error!("Failed to serialize feed for cache: {}", e);
            AppError::Cache(format!("Cache serialization error: {}", e))
        })?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(key, data, ttl_secs)
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        debug!("Feed cache WRITE for {} with TTL {}s", key, ttl_secs);
        Ok(())
    }
}

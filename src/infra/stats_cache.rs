use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use super::error::InfraError;
use crate::{
    app_error::{AppError, AppResult},
    use_cases::stats::{PlatformStats, StatsCache},
};

const STATS_KEY: &str = "platform:stats";

/// Redis-backed cache for platform statistics.
#[derive(Clone)]
pub struct RedisStatsCache {
    manager: ConnectionManager,
    ttl_secs: u64,
}

impl RedisStatsCache {
    pub async fn new(redis_url: &str, ttl_secs: u64) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url).map_err(InfraError::RedisConnection)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(InfraError::RedisConnection)?;
        Ok(Self {
            manager,
            ttl_secs: ttl_secs.max(1),
        })
    }
}

#[async_trait]
impl StatsCache for RedisStatsCache {
    async fn load(&self) -> AppResult<Option<PlatformStats>> {
        let mut conn = self.manager.clone();
        let raw: Option<String> = conn
            .get(STATS_KEY)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        // A corrupt entry counts as a miss and gets overwritten.
        Ok(raw.and_then(|json| serde_json::from_str(&json).ok()))
    }

    async fn store(&self, stats: &PlatformStats) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let json = serde_json::to_string(stats).map_err(|e| AppError::Internal(e.to_string()))?;
        let _: () = conn
            .set_ex(STATS_KEY, json, self.ttl_secs)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(())
    }
}

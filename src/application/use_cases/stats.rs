use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::app_error::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_therapists: i64,
    pub total_sessions: i64,
    pub active_therapists: i64,
    pub average_rating: f64,
}

#[async_trait]
pub trait StatsRepo: Send + Sync {
    async fn compute(&self) -> AppResult<PlatformStats>;
}

#[async_trait]
pub trait StatsCache: Send + Sync {
    async fn load(&self) -> AppResult<Option<PlatformStats>>;
    async fn store(&self, stats: &PlatformStats) -> AppResult<()>;
}

pub struct StatsUseCases {
    repo: Arc<dyn StatsRepo>,
    cache: Option<Arc<dyn StatsCache>>,
}

impl StatsUseCases {
    pub fn new(repo: Arc<dyn StatsRepo>, cache: Option<Arc<dyn StatsCache>>) -> Self {
        Self { repo, cache }
    }

    /// Cached statistics when available; cache failures fall through to the database.
    #[instrument(skip(self))]
    pub async fn get(&self) -> AppResult<PlatformStats> {
        if let Some(cache) = &self.cache {
            match cache.load().await {
                Ok(Some(stats)) => return Ok(stats),
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "Stats cache read failed"),
            }
        }

        let stats = self.repo.compute().await?;

        if let Some(cache) = &self.cache
            && let Err(err) = cache.store(&stats).await
        {
            tracing::warn!(error = %err, "Stats cache write failed");
        }

        Ok(stats)
    }
}

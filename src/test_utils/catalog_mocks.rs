//! In-memory catalogue and statistics backends.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        stats::{PlatformStats, StatsCache, StatsRepo},
        therapist::{TherapistFilter, TherapistRepo},
    },
    domain::entities::therapist::Therapist,
};

// ============================================================================
// InMemoryTherapistRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryTherapistRepo {
    therapists: Mutex<Vec<Therapist>>,
}

impl InMemoryTherapistRepo {
    pub fn with_therapists(mut therapists: Vec<Therapist>) -> Self {
        therapists.sort_by_key(|t| t.id);
        Self {
            therapists: Mutex::new(therapists),
        }
    }
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    needle
        .as_ref()
        .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

fn matches(therapist: &Therapist, filter: &TherapistFilter) -> bool {
    contains_ci(&therapist.specialization, &filter.specialization)
        && contains_ci(&therapist.approach, &filter.approach)
        && filter
            .min_experience
            .is_none_or(|min| therapist.experience >= min)
        && filter
            .max_price_kopecks
            .is_none_or(|max| i64::from(therapist.price_per_hour) <= max)
        && (!filter.online_only || therapist.is_online)
}

#[async_trait]
impl TherapistRepo for InMemoryTherapistRepo {
    async fn list(
        &self,
        filter: &TherapistFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Therapist>, i64)> {
        let therapists = self.therapists.lock().unwrap();
        let matching: Vec<&Therapist> = therapists.iter().filter(|t| matches(t, filter)).collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Therapist>> {
        Ok(self
            .therapists
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Returns fixed numbers and counts how often it was asked.
pub struct StaticStatsRepo {
    stats: PlatformStats,
    pub calls: AtomicUsize,
}

impl StaticStatsRepo {
    pub fn new(stats: PlatformStats) -> Self {
        Self {
            stats,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl StatsRepo for StaticStatsRepo {
    async fn compute(&self) -> AppResult<PlatformStats> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.stats.clone())
    }
}

#[derive(Default)]
pub struct InMemoryStatsCache {
    value: Mutex<Option<PlatformStats>>,
    /// Every call fails while set.
    pub broken: AtomicBool,
}

impl InMemoryStatsCache {
    pub fn with(stats: PlatformStats) -> Self {
        Self {
            value: Mutex::new(Some(stats)),
            broken: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> Option<PlatformStats> {
        self.value.lock().unwrap().clone()
    }

    fn check(&self) -> AppResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(AppError::Internal("cache unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl StatsCache for InMemoryStatsCache {
    async fn load(&self) -> AppResult<Option<PlatformStats>> {
        self.check()?;
        Ok(self.snapshot())
    }

    async fn store(&self, stats: &PlatformStats) -> AppResult<()> {
        self.check()?;
        *self.value.lock().unwrap() = Some(stats.clone());
        Ok(())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::therapist::Therapist,
};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TherapistFilter {
    /// Case-insensitive substring.
    pub specialization: Option<String>,
    /// Case-insensitive substring.
    pub approach: Option<String>,
    pub min_experience: Option<i32>,
    pub max_price_kopecks: Option<i64>,
    pub online_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let per_page = per_page
            .filter(|n| (1..=MAX_PER_PAGE).contains(n))
            .unwrap_or(DEFAULT_PER_PAGE);
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Raw query parameters. Unparseable numbers are ignored, not rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub specialization: Option<String>,
    pub approach: Option<String>,
    pub min_experience: Option<String>,
    /// Roubles.
    pub max_price: Option<String>,
    pub online_only: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> (TherapistFilter, Page) {
        let filter = TherapistFilter {
            specialization: non_empty(self.specialization),
            approach: non_empty(self.approach),
            min_experience: parse_num(self.min_experience.as_deref()),
            max_price_kopecks: parse_num::<i64>(self.max_price.as_deref())
                .map(|roubles| roubles.saturating_mul(100)),
            online_only: self.online_only.as_deref() == Some("true"),
        };
        let page = Page::new(
            parse_num(self.page.as_deref()),
            parse_num(self.per_page.as_deref()),
        );
        (filter, page)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_num<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Serialize)]
pub struct TherapistList {
    pub therapists: Vec<Therapist>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[async_trait]
pub trait TherapistRepo: Send + Sync {
    /// One page of matches plus the total match count.
    async fn list(
        &self,
        filter: &TherapistFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Therapist>, i64)>;
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Therapist>>;
}

pub struct TherapistUseCases {
    repo: Arc<dyn TherapistRepo>,
}

impl TherapistUseCases {
    pub fn new(repo: Arc<dyn TherapistRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: TherapistFilter, page: Page) -> AppResult<TherapistList> {
        let (therapists, total) = self
            .repo
            .list(&filter, page.per_page, page.offset())
            .await?;
        Ok(TherapistList {
            therapists,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> AppResult<Therapist> {
        self.repo.get_by_id(id).await?.ok_or(AppError::NotFound)
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::user::User;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Therapist {
    pub id: i64,
    pub user_id: i64,
    pub user: User,
    pub specialization: String,
    pub approach: String,
    /// Years of practice.
    pub experience: i32,
    /// Price in kopecks.
    pub price_per_hour: i32,
    pub rating: f64,
    pub review_count: i32,
    pub bio: String,
    pub languages: Vec<String>,
    pub is_online: bool,
    #[serde(rename = "next_available_slot")]
    pub next_slot: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

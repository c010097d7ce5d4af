use chrono::{DateTime, Utc};

/// A persisted refresh token. Redeemable at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRecord {
    pub value: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

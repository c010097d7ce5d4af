use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::{
    adapters::persistence::{PostgresPersistence, is_unique_violation},
    app_error::{AppError, AppResult},
    domain::entities::refresh_token::RefreshRecord,
    use_cases::token::RefreshTokenStore,
};

#[derive(sqlx::FromRow, Debug)]
struct RedeemedRow {
    user_id: i64,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

/// Refresh tokens are keyed by the SHA-256 of their value so the table never
/// holds a redeemable credential.
fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl RefreshTokenStore for PostgresPersistence {
    async fn put(&self, record: &RefreshRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens (token_hash, user_id, expires_at, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(hash_token(&record.value))
        .bind(record.user_id)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AppError::Conflict
            } else {
                AppError::from(err)
            }
        })?;
        Ok(())
    }

    async fn take(&self, value: &str) -> AppResult<Option<RefreshRecord>> {
        // Single statement: concurrent callers cannot both see the row.
        let row = sqlx::query_as::<_, RedeemedRow>(
            "DELETE FROM refresh_tokens \
             WHERE token_hash = $1 AND expires_at > NOW() \
             RETURNING user_id, expires_at, created_at",
        )
        .bind(hash_token(value))
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(|r| RefreshRecord {
            value: value.to_string(),
            user_id: r.user_id,
            expires_at: r.expires_at,
            created_at: r.created_at,
        }))
    }

    async fn delete_by_value(&self, value: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(hash_token(value))
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}

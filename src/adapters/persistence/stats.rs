use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    use_cases::stats::{PlatformStats, StatsRepo},
};

#[derive(sqlx::FromRow, Debug)]
struct StatsDb {
    total_therapists: i64,
    total_sessions: i64,
    active_therapists: i64,
    average_rating: f64,
}

#[async_trait]
impl StatsRepo for PostgresPersistence {
    async fn compute(&self) -> AppResult<PlatformStats> {
        let row = sqlx::query_as::<_, StatsDb>(
            r#"
                SELECT
                    (SELECT COUNT(*) FROM therapists) AS total_therapists,
                    (SELECT COUNT(*) FROM sessions) AS total_sessions,
                    (SELECT COUNT(*) FROM therapists WHERE is_online) AS active_therapists,
                    (SELECT COALESCE(AVG(rating), 0)::FLOAT8 FROM therapists) AS average_rating
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(PlatformStats {
            total_therapists: row.total_therapists,
            total_sessions: row.total_sessions,
            active_therapists: row.active_therapists,
            average_rating: row.average_rating,
        })
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::{
    adapters::persistence::{PostgresPersistence, parse_json_with_fallback},
    app_error::{AppError, AppResult},
    domain::entities::{therapist::Therapist, user::User},
    use_cases::therapist::{TherapistFilter, TherapistRepo},
};

const THERAPIST_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.specialization, t.approach, t.experience, t.price_per_hour,
           t.rating, t.review_count, t.bio, t.languages, t.is_online, t.next_available_slot,
           t.created_at,
           u.email AS user_email, u.name AS user_name, u.phone AS user_phone,
           u.avatar AS user_avatar, u.role AS user_role,
           u.is_email_verified AS user_is_email_verified,
           u.last_login_at AS user_last_login_at, u.created_at AS user_created_at,
           u.updated_at AS user_updated_at
    FROM therapists t
    JOIN users u ON u.id = t.user_id
"#;

const THERAPIST_COUNT: &str = "SELECT COUNT(*) FROM therapists t JOIN users u ON u.id = t.user_id";

// Therapist joined with its user, as read from the db.
#[derive(sqlx::FromRow, Debug)]
struct TherapistDb {
    id: i64,
    user_id: i64,
    specialization: String,
    approach: String,
    experience: i32,
    price_per_hour: i32,
    rating: f64,
    review_count: i32,
    bio: String,
    languages: serde_json::Value,
    is_online: bool,
    next_available_slot: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    user_email: String,
    user_name: String,
    user_phone: String,
    user_avatar: String,
    user_role: String,
    user_is_email_verified: bool,
    user_last_login_at: Option<DateTime<Utc>>,
    user_created_at: DateTime<Utc>,
    user_updated_at: DateTime<Utc>,
}

impl TherapistDb {
    fn into_therapist(self) -> AppResult<Therapist> {
        let role = self
            .user_role
            .parse()
            .map_err(|_| AppError::Internal(format!("user {} has invalid role", self.user_id)))?;
        let languages =
            parse_json_with_fallback(&self.languages, "languages", "therapist", &self.id.to_string());
        Ok(Therapist {
            id: self.id,
            user_id: self.user_id,
            user: User {
                id: self.user_id,
                email: self.user_email,
                name: self.user_name,
                phone: self.user_phone,
                avatar: self.user_avatar,
                role,
                is_email_verified: self.user_is_email_verified,
                last_login_at: self.user_last_login_at,
                created_at: self.user_created_at,
                updated_at: self.user_updated_at,
            },
            specialization: self.specialization,
            approach: self.approach,
            experience: self.experience,
            price_per_hour: self.price_per_hour,
            rating: self.rating,
            review_count: self.review_count,
            bio: self.bio,
            languages,
            is_online: self.is_online,
            next_slot: self.next_available_slot,
            created_at: self.created_at,
        })
    }
}

/// Escape LIKE metacharacters so user input matches literally.
fn like_pattern(raw: &str) -> String {
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &TherapistFilter) {
    qb.push(" WHERE TRUE");
    if let Some(spec) = &filter.specialization {
        qb.push(" AND t.specialization ILIKE ")
            .push_bind(like_pattern(spec));
    }
    if let Some(approach) = &filter.approach {
        qb.push(" AND t.approach ILIKE ")
            .push_bind(like_pattern(approach));
    }
    if let Some(min_exp) = filter.min_experience {
        qb.push(" AND t.experience >= ").push_bind(min_exp);
    }
    if let Some(max_price) = filter.max_price_kopecks {
        qb.push(" AND t.price_per_hour <= ").push_bind(max_price);
    }
    if filter.online_only {
        qb.push(" AND t.is_online = TRUE");
    }
}

#[async_trait]
impl TherapistRepo for PostgresPersistence {
    async fn list(
        &self,
        filter: &TherapistFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Therapist>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new(THERAPIST_COUNT);
        push_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        let mut select = QueryBuilder::<Postgres>::new(THERAPIST_SELECT);
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY t.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows: Vec<TherapistDb> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        let therapists = rows
            .into_iter()
            .map(TherapistDb::into_therapist)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((therapists, total))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Therapist>> {
        let sql = format!("{THERAPIST_SELECT} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TherapistDb>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        row.map(TherapistDb::into_therapist).transpose()
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    adapters::persistence::{PostgresPersistence, is_unique_violation},
    app_error::{AppError, AppResult},
    domain::entities::{
        identity::{Identity, Role},
        user::User,
    },
    use_cases::{
        token::IdentityRepo,
        user::{NewUser, UserCredentials, UserRepo},
    },
};

const USER_COLUMNS: &str = "id, email, password_hash, name, phone, avatar, role, \
     is_email_verified, last_login_at, created_at, updated_at";

// User struct as stored in the db.
#[derive(sqlx::FromRow, Debug)]
pub struct UserDb {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub avatar: String,
    pub role: String,
    pub is_email_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDb {
    fn into_credentials(self) -> AppResult<UserCredentials> {
        let role: Role = self.role.parse().map_err(|e| {
            tracing::error!(user_id = self.id, error = %e, "Stored role is invalid");
            AppError::Internal(format!("user {} has invalid role", self.id))
        })?;
        Ok(UserCredentials {
            user: User {
                id: self.id,
                email: self.email,
                name: self.name,
                phone: self.phone,
                avatar: self.avatar,
                role,
                is_email_verified: self.is_email_verified,
                last_login_at: self.last_login_at,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            password_hash: self.password_hash,
        })
    }

    fn into_user(self) -> AppResult<User> {
        self.into_credentials().map(|c| c.user)
    }
}

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, name, phone, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let rec = sqlx::query_as::<_, UserDb>(&sql)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.name)
            .bind(&new_user.phone)
            .bind(new_user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AppError::EmailTaken
                } else {
                    AppError::from(err)
                }
            })?;
        rec.into_user()
    }

    async fn get_credentials_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let rec = sqlx::query_as::<_, UserDb>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        rec.map(UserDb::into_credentials).transpose()
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let rec = sqlx::query_as::<_, UserDb>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        rec.map(UserDb::into_user).transpose()
    }

    async fn touch_last_login(&self, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}

#[async_trait]
impl IdentityRepo for PostgresPersistence {
    async fn lookup_identity_by_id(&self, id: i64) -> AppResult<Option<Identity>> {
        Ok(UserRepo::get_by_id(self, id)
            .await?
            .map(|user| user.identity()))
    }
}

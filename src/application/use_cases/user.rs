use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        use_cases::token::{TokenPair, TokenUseCases},
        validators::{MIN_PASSWORD_LEN, is_valid_email, is_valid_password},
    },
    domain::entities::{identity::Role, user::User},
    infra::password::{hash_password_blocking, verify_password_blocking},
};

pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}

pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// `AppError::EmailTaken` if the email is already registered.
    async fn create(&self, new_user: &NewUser) -> AppResult<User>;
    async fn get_credentials_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>>;
    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;
    async fn touch_last_login(&self, id: i64) -> AppResult<()>;
}

pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
    tokens: Arc<TokenUseCases>,
}

impl AuthUseCases {
    pub fn new(repo: Arc<dyn UserRepo>, tokens: Arc<TokenUseCases>) -> Self {
        Self { repo, tokens }
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> AppResult<User> {
        let email = normalize_email(&registration.email);
        if !is_valid_email(&email) {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }
        if !is_valid_password(&registration.password) {
            return Err(AppError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let name = registration.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidInput("Name is required".into()));
        }

        let role = match registration.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|e| AppError::InvalidInput(e.to_string()))?,
        };
        if !role.is_self_assignable() {
            return Err(AppError::InvalidInput(format!("Role {role} cannot be requested")));
        }

        if self.repo.get_credentials_by_email(&email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let password_hash = hash_password_blocking(registration.password).await?;
        let user = self
            .repo
            .create(&NewUser {
                email,
                password_hash,
                name,
                phone: registration.phone.unwrap_or_default().trim().to_string(),
                role,
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User registered");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let email = normalize_email(email);
        let credentials = self.repo.get_credentials_by_email(&email).await?;
        // Unknown e-mails still pay for a verification.
        let stored_hash = credentials.as_ref().map(|c| c.password_hash.clone());
        let verified = verify_password_blocking(password.to_string(), stored_hash).await?;
        let Some(credentials) = credentials.filter(|_| verified) else {
            return Err(AppError::InvalidCredentials);
        };

        let mut user = credentials.user;
        let tokens = self.tokens.issue_for_identity(&user.identity()).await?;

        match self.repo.touch_last_login(user.id).await {
            Ok(()) => user.last_login_at = Some(Utc::now()),
            Err(err) => {
                tracing::warn!(user_id = user.id, error = %err, "Failed to record last login");
            }
        }

        Ok(LoginOutcome { user, tokens })
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: i64) -> AppResult<User> {
        self.repo.get_by_id(user_id).await?.ok_or(AppError::NotFound)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

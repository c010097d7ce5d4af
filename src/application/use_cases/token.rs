use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::{jwt::AccessTokenSigner, opaque_token::TokenGenerator},
    domain::entities::{identity::Identity, refresh_token::RefreshRecord},
};

/// Persistence for issued refresh tokens.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert a new record. `AppError::Conflict` if the value already exists.
    async fn put(&self, record: &RefreshRecord) -> AppResult<()>;

    /// Delete the unexpired record for `value` and return it, as one atomic step.
    /// At most one caller ever receives a given record.
    async fn take(&self, value: &str) -> AppResult<Option<RefreshRecord>>;

    /// Unconditional delete. Absence is not an error.
    async fn delete_by_value(&self, value: &str) -> AppResult<()>;
}

#[async_trait]
pub trait IdentityRepo: Send + Sync {
    async fn lookup_identity_by_id(&self, id: i64) -> AppResult<Option<Identity>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

pub struct TokenUseCases {
    signer: Arc<AccessTokenSigner>,
    generator: Arc<dyn TokenGenerator>,
    store: Arc<dyn RefreshTokenStore>,
    identities: Arc<dyn IdentityRepo>,
    refresh_ttl: time::Duration,
}

impl TokenUseCases {
    pub fn new(
        signer: Arc<AccessTokenSigner>,
        generator: Arc<dyn TokenGenerator>,
        store: Arc<dyn RefreshTokenStore>,
        identities: Arc<dyn IdentityRepo>,
        refresh_ttl: time::Duration,
    ) -> Self {
        Self {
            signer,
            generator,
            store,
            identities,
            refresh_ttl,
        }
    }

    pub fn signer(&self) -> &AccessTokenSigner {
        &self.signer
    }

    /// Mint an access token and a fresh stored refresh token for `identity`.
    #[instrument(skip(self, identity), fields(user_id = identity.id))]
    pub async fn issue_for_identity(&self, identity: &Identity) -> AppResult<TokenPair> {
        let access_token = self.signer.issue(identity)?;
        let refresh_token = self.generator.generate()?;

        let now = Utc::now();
        let expires_at = chrono::TimeDelta::try_seconds(self.refresh_ttl.whole_seconds())
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::Config("refresh token lifetime out of range".into()))?;
        let record = RefreshRecord {
            value: refresh_token.clone(),
            user_id: identity.id,
            expires_at,
            created_at: now,
        };

        self.store.put(&record).await.map_err(|err| {
            tracing::error!(error = %err, "Failed to persist refresh token");
            AppError::Issuance(err.to_string())
        })?;

        tracing::debug!("Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.signer.ttl().whole_seconds(),
        })
    }

    /// Redeem a refresh token for a new pair. The presented value is consumed
    /// even when issuing the replacement fails.
    #[instrument(skip_all)]
    pub async fn rotate(&self, presented: &str) -> AppResult<TokenPair> {
        let record = self
            .store
            .take(presented)
            .await?
            .ok_or(AppError::InvalidRefresh)?;

        let identity = self
            .identities
            .lookup_identity_by_id(record.user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = record.user_id, "Refresh token owner no longer exists");
                AppError::InvalidRefresh
            })?;

        self.issue_for_identity(&identity).await
    }

    /// Drop a refresh token. Never reports whether it existed.
    #[instrument(skip_all)]
    pub async fn revoke(&self, value: &str) {
        if let Err(err) = self.store.delete_by_value(value).await {
            tracing::error!(error = %err, "Failed to delete refresh token");
        }
    }
}

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::identity::{Identity, Role};

/// The only algorithm tokens are signed with or accepted under.
const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl AccessClaims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.user_id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Signs and verifies access tokens with a shared HMAC secret.
pub struct AccessTokenSigner {
    secret: SecretString,
    ttl: Duration,
}

impl AccessTokenSigner {
    pub fn new(secret: SecretString, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &Identity) -> AppResult<String> {
        self.issue_at(identity, OffsetDateTime::now_utc())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, identity: &Identity, now: OffsetDateTime) -> AppResult<String> {
        let secret = self.secret_bytes()?;
        let iat = now.unix_timestamp();
        let exp = iat
            .checked_add(self.ttl.whole_seconds())
            .ok_or_else(|| AppError::Config("access token lifetime out of range".into()))?;
        let claims = AccessClaims {
            user_id: identity.id,
            email: identity.email.clone(),
            role: identity.role,
            iat,
            exp,
        };
        encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> AppResult<AccessClaims> {
        let secret = self.secret_bytes()?;

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        decode::<AccessClaims>(token, &DecodingKey::from_secret(secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "Access token rejected");
                AppError::InvalidToken
            })
    }

    fn secret_bytes(&self) -> AppResult<&[u8]> {
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            return Err(AppError::Config("signing secret is not configured".into()));
        }
        Ok(secret.as_bytes())
    }
}

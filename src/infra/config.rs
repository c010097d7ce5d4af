use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::{ExposeSecret, SecretString};
use time::Duration;
use url::Url;

use super::error::InfraError;

pub struct AppConfig {
    pub tokens: TokenConfig,
    pub database_url: String,
    /// Stats caching is disabled when unset.
    pub redis_url: Option<String>,
    pub stats_cache_ttl_secs: u64,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<HeaderValue>,
    /// Optional JSON log file in addition to console output.
    pub log_file: Option<String>,
}

pub struct TokenConfig {
    pub signing_secret: SecretString,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

pub const MAX_ACCESS_TTL: Duration = Duration::DAY;
pub const MAX_REFRESH_TTL: Duration = Duration::days(365);

impl TokenConfig {
    pub fn new(signing_secret: SecretString, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            signing_secret,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.signing_secret.expose_secret().trim().is_empty() {
            return Err(InfraError::ConfigInvalid {
                var: "JWT_SECRET",
                reason: "must not be empty".into(),
            });
        }
        if !self.access_ttl.is_positive() {
            return Err(InfraError::ConfigInvalid {
                var: "ACCESS_TOKEN_TTL_SECS",
                reason: "must be positive".into(),
            });
        }
        if self.access_ttl > MAX_ACCESS_TTL {
            return Err(InfraError::ConfigInvalid {
                var: "ACCESS_TOKEN_TTL_SECS",
                reason: format!("must not exceed {} seconds", MAX_ACCESS_TTL.whole_seconds()),
            });
        }
        if !self.refresh_ttl.is_positive() {
            return Err(InfraError::ConfigInvalid {
                var: "REFRESH_TOKEN_TTL_DAYS",
                reason: "must be positive".into(),
            });
        }
        if self.refresh_ttl > MAX_REFRESH_TTL {
            return Err(InfraError::ConfigInvalid {
                var: "REFRESH_TOKEN_TTL_DAYS",
                reason: format!("must not exceed {} days", MAX_REFRESH_TTL.whole_days()),
            });
        }
        Ok(())
    }
}

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let signing_secret = std::env::var("JWT_SECRET")
            .map_err(|_| InfraError::ConfigMissing { var: "JWT_SECRET" })?;
        let access_token_ttl_secs: i64 = get_env_default("ACCESS_TOKEN_TTL_SECS", 900);
        let refresh_token_ttl_days: i64 = get_env_default("REFRESH_TOKEN_TTL_DAYS", 7);

        let tokens = TokenConfig::new(
            SecretString::new(signing_secret.into()),
            Duration::seconds(access_token_ttl_secs),
            days_saturating(refresh_token_ttl_days),
        );
        tokens.validate()?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| InfraError::ConfigMissing { var: "DATABASE_URL" })?;
        let redis_url = std::env::var("REDIS_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let stats_cache_ttl_secs: u64 = get_env_default("STATS_CACHE_TTL_SECS", 300);
        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)));
        let cors_origins = parse_origins(&get_env_default(
            "CORS_ORIGINS",
            DEFAULT_CORS_ORIGINS.to_string(),
        ))?;
        let log_file = std::env::var("LOG_FILE").ok().filter(|p| !p.is_empty());

        Ok(Self {
            tokens,
            database_url,
            redis_url,
            stats_cache_ttl_secs,
            bind_addr,
            cors_origins,
            log_file,
        })
    }
}

/// `Duration::days` panics past its range; out-of-range values are left to `validate`.
fn days_saturating(days: i64) -> Duration {
    Duration::seconds(days.saturating_mul(86_400))
}

/// Comma separated origins. Each must be an absolute URL; a trailing slash is dropped.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, InfraError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            let invalid = |reason: String| InfraError::ConfigInvalid {
                var: "CORS_ORIGINS",
                reason,
            };
            let url = Url::parse(origin).map_err(|e| invalid(format!("{origin}: {e}")))?;
            let serialized = url.origin().ascii_serialization();
            HeaderValue::from_str(&serialized).map_err(|e| invalid(format!("{origin}: {e}")))
        })
        .collect()
}

//! `TestAppStateBuilder` assembles an `AppState` over in-memory mocks.

use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        jwt::AccessTokenSigner,
        opaque_token::OsTokenGenerator,
        use_cases::{
            stats::{PlatformStats, StatsUseCases},
            therapist::TherapistUseCases,
            token::TokenUseCases,
            user::AuthUseCases,
        },
    },
    domain::entities::{therapist::Therapist, user::User},
    infra::config::{AppConfig, TokenConfig},
    test_utils::{
        InMemoryRefreshTokenStore, InMemoryTherapistRepo, InMemoryUserRepo, StaticStatsRepo,
    },
};

pub const TEST_SIGNING_SECRET: &str = "test-secret";

/// # Example
///
/// ```ignore
/// let app_state = TestAppStateBuilder::new()
///     .with_user(create_test_user(|u| u.id = 5))
///     .with_therapist(create_test_therapist(|t| t.is_online = true))
///     .build();
/// ```
#[derive(Default)]
pub struct TestAppStateBuilder {
    users: Vec<User>,
    therapists: Vec<Therapist>,
    stats: Option<PlatformStats>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_therapist(mut self, therapist: Therapist) -> Self {
        self.therapists.push(therapist);
        self
    }

    pub fn with_stats(mut self, stats: PlatformStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(self) -> AppState {
        let config = test_config();

        let users = Arc::new(InMemoryUserRepo::with_users(self.users));
        let signer = Arc::new(AccessTokenSigner::new(
            SecretString::new(TEST_SIGNING_SECRET.into()),
            config.tokens.access_ttl,
        ));
        let token_use_cases = Arc::new(TokenUseCases::new(
            signer,
            Arc::new(OsTokenGenerator),
            Arc::new(InMemoryRefreshTokenStore::new()),
            users.clone(),
            config.tokens.refresh_ttl,
        ));
        let auth_use_cases = Arc::new(AuthUseCases::new(users, token_use_cases.clone()));
        let therapist_use_cases = Arc::new(TherapistUseCases::new(Arc::new(
            InMemoryTherapistRepo::with_therapists(self.therapists),
        )));
        let stats = self.stats.unwrap_or(PlatformStats {
            total_therapists: 0,
            total_sessions: 0,
            active_therapists: 0,
            average_rating: 0.0,
        });
        let stats_use_cases = Arc::new(StatsUseCases::new(
            Arc::new(StaticStatsRepo::new(stats)),
            None,
        ));

        AppState {
            config: Arc::new(config),
            token_use_cases,
            auth_use_cases,
            therapist_use_cases,
            stats_use_cases,
        }
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        tokens: TokenConfig::new(
            SecretString::new(TEST_SIGNING_SECRET.into()),
            Duration::minutes(15),
            Duration::days(7),
        ),
        database_url: "postgres://unused".to_string(),
        redis_url: None,
        stats_cache_ttl_secs: 300,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origins: vec![HeaderValue::from_static("http://localhost:3000")],
        log_file: None,
    }
}

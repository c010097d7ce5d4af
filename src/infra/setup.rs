use crate::{
    adapters::http::app_state::AppState,
    application::{
        jwt::AccessTokenSigner,
        opaque_token::OsTokenGenerator,
        use_cases::{
            stats::{StatsCache, StatsRepo, StatsUseCases},
            therapist::{TherapistRepo, TherapistUseCases},
            token::{IdentityRepo, RefreshTokenStore, TokenUseCases},
            user::{AuthUseCases, UserRepo},
        },
    },
    infra::{config::AppConfig, postgres_persistence, stats_cache::RedisStatsCache},
};
use secrecy::{ExposeSecret, SecretString};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let stats_cache = match &config.redis_url {
        Some(url) => {
            let cache = RedisStatsCache::new(url, config.stats_cache_ttl_secs).await?;
            tracing::info!("Stats cache enabled");
            Some(Arc::new(cache) as Arc<dyn StatsCache>)
        }
        None => {
            tracing::info!("REDIS_URL not set, stats cache disabled");
            None
        }
    };

    let signer = Arc::new(AccessTokenSigner::new(
        SecretString::new(config.tokens.signing_secret.expose_secret().into()),
        config.tokens.access_ttl,
    ));

    let token_use_cases = Arc::new(TokenUseCases::new(
        signer,
        Arc::new(OsTokenGenerator),
        postgres_arc.clone() as Arc<dyn RefreshTokenStore>,
        postgres_arc.clone() as Arc<dyn IdentityRepo>,
        config.tokens.refresh_ttl,
    ));

    let auth_use_cases = AuthUseCases::new(
        postgres_arc.clone() as Arc<dyn UserRepo>,
        token_use_cases.clone(),
    );
    let therapist_use_cases =
        TherapistUseCases::new(postgres_arc.clone() as Arc<dyn TherapistRepo>);
    let stats_use_cases = StatsUseCases::new(postgres_arc as Arc<dyn StatsRepo>, stats_cache);

    Ok(AppState {
        config: Arc::new(config),
        token_use_cases,
        auth_use_cases: Arc::new(auth_use_cases),
        therapist_use_cases: Arc::new(therapist_use_cases),
        stats_use_cases: Arc::new(stats_use_cases),
    })
}

pub fn init_tracing(log_file: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "psyportal=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs), only when requested
    let json_layer = log_file.and_then(|path| match File::create(path) {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(true)
                .with_span_list(true),
        ),
        Err(err) => {
            eprintln!("cannot create log file {path}: {err}");
            None
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}

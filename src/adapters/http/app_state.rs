use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{
        stats::StatsUseCases, therapist::TherapistUseCases, token::TokenUseCases,
        user::AuthUseCases,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_use_cases: Arc<TokenUseCases>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub therapist_use_cases: Arc<TherapistUseCases>,
    pub stats_use_cases: Arc<StatsUseCases>,
}

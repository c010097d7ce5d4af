pub mod auth;
pub mod health;
pub mod profile;
pub mod stats;
pub mod therapist;

use axum::{Router, middleware};

use crate::adapters::http::{app_state::AppState, middleware::require_auth};

pub fn router(app_state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(profile::router())
        .route_layer(middleware::from_fn_with_state(app_state, require_auth));

    Router::new()
        .merge(health::router())
        .merge(stats::router())
        .merge(therapist::router())
        .nest("/auth", auth::router())
        .merge(protected)
}

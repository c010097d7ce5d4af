use axum::{Router, response::IntoResponse, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::adapters::http::{app_state::AppState, response::ok};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    time: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> impl IntoResponse {
    ok(HealthResponse {
        status: "healthy",
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

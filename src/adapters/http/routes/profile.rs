use axum::{Router, extract::State, response::IntoResponse, routing::get};

use crate::{
    adapters::http::{app_state::AppState, middleware::AuthUser, response::ok},
    app_error::AppResult,
};

/// Routes here sit behind `require_auth`.
pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

async fn profile(
    State(app_state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let profile = app_state.auth_use_cases.profile(user.user_id).await?;
    Ok(ok(profile))
}

use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, json::ApiJson, response::ok},
    app_error::{AppError, AppResult},
    domain::entities::user::User,
    use_cases::{token::TokenPair, user::Registration},
};

#[derive(Deserialize)]
struct RegisterPayload {
    email: String,
    password: String,
    name: String,
    phone: Option<String>,
    role: Option<String>,
}

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RefreshPayload {
    refresh_token: String,
}

#[derive(Serialize)]
struct RegisteredResponse {
    user: User,
    message: &'static str,
}

#[derive(Serialize)]
struct TokensResponse {
    tokens: TokenPair,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

async fn register(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .register(Registration {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            phone: payload.phone,
            role: payload.role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        ok(RegisteredResponse {
            user,
            message: "Registration successful",
        }),
    ))
}

async fn login(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let outcome = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await?;
    Ok(ok(outcome))
}

async fn refresh(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshPayload>,
) -> AppResult<impl IntoResponse> {
    let presented = required_token(&payload)?;
    let tokens = app_state.token_use_cases.rotate(presented).await?;
    Ok(ok(TokensResponse { tokens }))
}

async fn logout(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshPayload>,
) -> AppResult<impl IntoResponse> {
    let presented = required_token(&payload)?;
    app_state.token_use_cases.revoke(presented).await;
    Ok(ok(MessageResponse {
        message: "Logged out",
    }))
}

fn required_token(payload: &RefreshPayload) -> AppResult<&str> {
    // Opaque value, matched byte for byte.
    if payload.refresh_token.is_empty() {
        return Err(AppError::InvalidInput("refresh_token is required".into()));
    }
    Ok(&payload.refresh_token)
}

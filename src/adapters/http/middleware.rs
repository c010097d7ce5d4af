use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::jwt::AccessTokenSigner,
    domain::entities::identity::Role,
};

pub const BEARER_SCHEME: &str = "Bearer";

/// Identity attached to a request that passed `require_auth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

/// Gate for protected routes. Never touches refresh token storage.
pub async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), app_state.token_use_cases.signer())?;

    tracing::debug!(user_id = user.user_id, role = %user.role, "Authenticated request");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn authenticate(headers: &HeaderMap, signer: &AccessTokenSigner) -> AppResult<AuthUser> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::MissingCredential)?
        .to_str()
        .map_err(|_| AppError::MalformedCredential)?;
    if value.is_empty() {
        return Err(AppError::MissingCredential);
    }

    let token = bearer_token(value)?;
    let claims = signer
        .verify(token)
        .map_err(|_| AppError::InvalidCredential)?;

    Ok(AuthUser {
        user_id: claims.user_id,
        email: claims.email,
        role: claims.role,
    })
}

/// Exactly `Bearer <token>`, split on single spaces.
fn bearer_token(value: &str) -> AppResult<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => Ok(token),
        _ => Err(AppError::MalformedCredential),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::MissingCredential)
    }
}

use crate::adapters::http::response::failure;
use crate::app_error::{AppError, ErrorCode};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = classify(&self);

        // Log the error before it gets converted into a status response.
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::info!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, failure(code.as_str(), message)).into_response()
    }
}

/// Status, wire code and client-safe message. Internal detail never leaves here.
fn classify(err: &AppError) -> (StatusCode, ErrorCode, String) {
    match err {
        AppError::InvalidInput(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidInput,
            msg.clone(),
        ),
        AppError::EmailTaken => (
            StatusCode::BAD_REQUEST,
            ErrorCode::EmailTaken,
            "A user with this email already exists".into(),
        ),
        AppError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidCredentials,
            "Invalid email or password".into(),
        ),
        AppError::MissingCredential => (
            StatusCode::UNAUTHORIZED,
            ErrorCode::MissingCredential,
            "Authorization required".into(),
        ),
        AppError::MalformedCredential => (
            StatusCode::UNAUTHORIZED,
            ErrorCode::MalformedCredential,
            "Invalid authorization header format".into(),
        ),
        // Expired and forged tokens look the same to the client.
        AppError::InvalidCredential | AppError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidCredential,
            "Invalid token".into(),
        ),
        AppError::InvalidRefresh => (
            StatusCode::UNAUTHORIZED,
            ErrorCode::SessionEnded,
            "Session ended, please log in again".into(),
        ),
        AppError::NotFound => (StatusCode::NOT_FOUND, ErrorCode::NotFound, "Not found".into()),
        AppError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::DatabaseError,
            "Internal server error".into(),
        ),
        AppError::Config(_)
        | AppError::Conflict
        | AppError::Entropy(_)
        | AppError::Issuance(_)
        | AppError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            "Internal server error".into(),
        ),
    }
}

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::app_error::AppError;

/// `Json` whose rejection goes through `AppError`, so bad bodies get the
/// usual envelope instead of axum's plain-text reply.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // Deserializer detail stays in the logs.
        tracing::debug!(reason = %rejection.body_text(), "Request body rejected");
        AppError::InvalidInput("Invalid request body".into())
    }
}

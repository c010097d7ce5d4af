use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Not found")]
    NotFound,

    /// Access token failed signature, shape or expiry checks.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing credential")]
    MissingCredential,

    #[error("Malformed credential")]
    MalformedCredential,

    #[error("Invalid credential")]
    InvalidCredential,

    /// Refresh token absent, expired or already redeemed.
    #[error("Invalid refresh token")]
    InvalidRefresh,

    #[error("Refresh token already exists")]
    Conflict,

    #[error("Entropy source failed: {0}")]
    Entropy(String),

    #[error("Token issuance failed: {0}")]
    Issuance(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    DatabaseError,
    InvalidCredentials,
    InvalidInput,
    EmailTaken,
    NotFound,
    MissingCredential,
    MalformedCredential,
    InvalidCredential,
    SessionEnded,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::EmailTaken => "EMAIL_TAKEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::MissingCredential => "MISSING_CREDENTIAL",
            ErrorCode::MalformedCredential => "MALFORMED_CREDENTIAL",
            ErrorCode::InvalidCredential => "INVALID_CREDENTIAL",
            ErrorCode::SessionEnded => "SESSION_ENDED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

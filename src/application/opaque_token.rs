use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::app_error::{AppError, AppResult};

/// Random bytes behind every refresh token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Source of opaque refresh token values.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> AppResult<String>;
}

/// Draws from the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsTokenGenerator;

impl TokenGenerator for OsTokenGenerator {
    fn generate(&self) -> AppResult<String> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| AppError::Entropy(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }
}

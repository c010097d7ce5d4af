pub mod app_error;
pub mod jwt;
pub mod opaque_token;
pub mod use_cases;
pub mod validators;

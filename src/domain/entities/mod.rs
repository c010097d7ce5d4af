pub mod identity;
pub mod refresh_token;
pub mod therapist;
pub mod user;

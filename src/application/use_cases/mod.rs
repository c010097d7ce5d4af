pub mod stats;
pub mod therapist;
pub mod token;
pub mod user;

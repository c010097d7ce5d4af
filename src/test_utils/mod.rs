//! Test utilities shared by unit and HTTP-level tests.
//!
//! - Factories for valid fixtures
//! - In-memory implementations of the persistence traits
//! - `TestAppStateBuilder` for driving the router without Postgres or Redis

mod app_state_builder;
mod auth_mocks;
mod catalog_mocks;
mod factories;

pub use app_state_builder::*;
pub use auth_mocks::*;
pub use catalog_mocks::*;
pub use factories::*;

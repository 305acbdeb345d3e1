//! Configuration module
//!
//! Fixture documents and the resolved harness endpoint. Both are read once
//! at startup and handed to the harness by value.

pub mod loader;
pub mod schema;

pub use loader::{FixtureLimits, FixtureLoader};
pub use schema::*;

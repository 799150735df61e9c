//! Integration test support
//!
//! Spawns the real API server against a test database and drives it over
//! HTTP. Tests are skipped unless `DATABASE_URL` points at a migrated
//! PostgreSQL instance.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;

//! Persistence layer for the GroomBook backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - SQL migrations (embedded via `sqlx::migrate!`)

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;

//! # Taskboard Shared Library
//!
//! Data model, storage, and business rules for the Taskboard backend.
//! The API crate is a thin HTTP layer over the services defined here.
//!
//! ## Module Organization
//!
//! - `models`: Entity shapes and their PostgreSQL queries
//! - `store`: Storage port with PostgreSQL and in-memory adapters
//! - `services`: Membership, task lifecycle, project and user operations
//! - `projection`: Storage-shaped to wire-shaped conversion
//! - `auth`: Credential schemes
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod projection;
pub mod services;
pub mod store;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

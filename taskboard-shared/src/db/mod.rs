/// Database layer for Taskboard
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with startup health check
/// - `migrations`: Embedded schema migrations
///
/// Models (and their SQL) are in the `models` module at crate root level.

pub mod migrations;
pub mod pool;

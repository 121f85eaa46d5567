/// Database models for Taskboard
///
/// Each model owns its SQL as associated functions that accept any
/// `PgExecutor`, so the same query runs against the pool or inside a
/// transaction.
///
/// # Models
///
/// - `user`: Accounts, credentials and avatars
/// - `project`: Projects
/// - `task`: Tasks and their open status
/// - `membership`: User ↔ project relation
/// - `nullable`: Normalization of optional text
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::project::{CreateProject, Project};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let id = Project::create(&pool, CreateProject { name: "Website".to_string() }).await?;
/// let name = Project::find_name(&pool, id).await?;
/// # Ok(())
/// # }
/// ```

pub mod membership;
pub mod nullable;
pub mod project;
pub mod task;
pub mod user;

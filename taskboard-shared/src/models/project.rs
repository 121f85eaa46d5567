/// Project model and database operations
///
/// A project is just an ID and a name. Tasks point at their project through
/// `tasks.project_id`; the project never lists its tasks itself, they are
/// always fetched by query.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Project model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Project name
    pub name: String,
}

/// Input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
}

impl Project {
    /// Inserts a project and returns its ID
    pub async fn create<'e, E>(executor: E, data: CreateProject) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let id: i64 = sqlx::query_scalar("INSERT INTO projects (name) VALUES ($1) RETURNING id")
            .bind(data.name)
            .fetch_one(executor)
            .await?;

        Ok(id)
    }

    /// Looks up a project's name
    pub async fn find_name<'e, E>(executor: E, id: i64) -> Result<Option<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(name)
    }

    /// Checks whether a project ID exists
    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(executor)
                .await?;

        Ok(exists)
    }

    /// Deletes the project row only
    ///
    /// Callers that need the full cascade (tasks and membership) go through
    /// [`crate::store::Store::delete_project_cascade`].
    ///
    /// # Returns
    ///
    /// True if a row was deleted
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

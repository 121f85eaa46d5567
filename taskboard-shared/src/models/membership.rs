/// Membership model and database operations
///
/// Membership is the many-to-many relation between users and projects. It is
/// kept in an explicit join table instead of an array column on `users`, so
/// adding and removing are single-row statements with no read-modify-write
/// window.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_projects (
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     PRIMARY KEY (user_id, project_id)
/// );
/// ```
///
/// The primary key gives set semantics: adding a project the user already
/// belongs to leaves the set unchanged.

use sqlx::PgExecutor;

/// Namespace for membership queries
pub struct Membership;

impl Membership {
    /// Adds a project to a user's set
    ///
    /// # Returns
    ///
    /// True if the pair was new, false if it was already present
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if either side does not exist
    pub async fn add<'e, E>(executor: E, user_id: i64, project_id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO user_projects (user_id, project_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, project_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a project from a user's set
    ///
    /// # Returns
    ///
    /// True if the user was a member
    pub async fn remove<'e, E>(executor: E, user_id: i64, project_id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("DELETE FROM user_projects WHERE user_id = $1 AND project_id = $2")
                .bind(user_id)
                .bind(project_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a project from every user's set
    ///
    /// # Returns
    ///
    /// Number of memberships removed
    pub async fn remove_project<'e, E>(executor: E, project_id: i64) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM user_projects WHERE project_id = $1")
            .bind(project_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Lists the project IDs a user belongs to, ascending
    pub async fn list_for_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<i64>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT project_id FROM user_projects WHERE user_id = $1 ORDER BY project_id",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(ids)
    }
}

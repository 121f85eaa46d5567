/// Task model and database operations
///
/// Tasks belong to exactly one project and may be assigned to a user. Optional
/// text columns (`descr`, `date_act`, `empl_id`, `priority`) are nullable and
/// start out absent; see [`crate::models::nullable`] for how they render.
///
/// # Status
///
/// Status is an open string. No transitions are enforced: any value may be
/// written at any time. The values seen in practice are modelled by
/// [`TaskStatus`], which keeps unknown strings intact.
///
/// ```text
/// todo ⇄ in_progress ⇄ done      (conventional, not enforced)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     descr TEXT,
///     date TEXT NOT NULL,
///     date_act TEXT,
///     empl_id TEXT,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     status TEXT NOT NULL,
///     priority TEXT
/// );
/// ```
///
/// `empl_id` is text and is joined loosely against `users.id`, it is not a
/// foreign key.

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;

/// Conventional task status values
///
/// Unknown values are carried in [`TaskStatus::Other`] so that reading and
/// writing back a status never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,

    /// Any other value
    Other(String),
}

impl TaskStatus {
    /// Parses a stored status string
    pub fn parse(value: &str) -> Self {
        match value {
            "todo" => TaskStatus::Todo,
            "in_progress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            other => TaskStatus::Other(other.to_string()),
        }
    }

    /// String stored in the database
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Other(value) => value,
        }
    }

    /// Whether this is one of the conventional values
    pub fn is_conventional(&self) -> bool {
        !matches!(self, TaskStatus::Other(_))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Task name
    pub name: String,

    /// Optional description
    pub descr: Option<String>,

    /// Creation/due date, free-form
    pub date: String,

    /// Optional activation/completion date, free-form
    pub date_act: Option<String>,

    /// Assignee user ID as text (empty or None means unassigned)
    pub empl_id: Option<String>,

    /// Owning project
    #[serde(rename = "projectId")]
    pub project_id: i64,

    /// Open status string
    pub status: String,

    /// Optional priority
    pub priority: Option<String>,
}

/// A task joined with its assignee's avatar
///
/// Produced by a left outer join, so unassigned tasks are included with
/// `avatar = None`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TaskWithAvatar {
    #[sqlx(flatten)]
    pub task: Task,

    /// Assignee avatar, if the task is assigned to an existing user who has one
    pub avatar: Option<Vec<u8>>,
}

/// Input for creating a task
///
/// Optional fields default to absent, not to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTask {
    pub name: String,

    #[serde(default)]
    pub descr: Option<String>,

    pub date: String,

    #[serde(default)]
    pub date_act: Option<String>,

    #[serde(default)]
    pub empl_id: Option<String>,

    #[serde(rename = "projectId")]
    pub project_id: i64,

    pub status: String,

    #[serde(default)]
    pub priority: Option<String>,
}

impl Task {
    /// Inserts a task and returns its ID
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the project does not exist
    pub async fn create<'e, E>(executor: E, data: CreateTask) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tasks (name, descr, date, date_act, empl_id, project_id, status, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(data.name)
        .bind(data.descr)
        .bind(data.date)
        .bind(data.date_act)
        .bind(data.empl_id)
        .bind(data.project_id)
        .bind(data.status)
        .bind(data.priority)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    /// Finds a task by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, descr, date, date_act, empl_id, project_id, status, priority
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(task)
    }

    /// Lists a project's tasks with each assignee's avatar
    pub async fn list_by_project_with_avatar<'e, E>(
        executor: E,
        project_id: i64,
    ) -> Result<Vec<TaskWithAvatar>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let tasks = sqlx::query_as::<_, TaskWithAvatar>(
            r#"
            SELECT t.id, t.name, t.descr, t.date, t.date_act, t.empl_id,
                   t.project_id, t.status, t.priority, u.avatar
            FROM tasks t
            LEFT JOIN users u ON u.id::text = t.empl_id
            WHERE t.project_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;

        Ok(tasks)
    }

    /// Overwrites the status, no transition check
    pub async fn update_status<'e, E>(executor: E, id: i64, status: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE tasks SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrites the assignee
    pub async fn assign<'e, E>(executor: E, id: i64, empl_id: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE tasks SET empl_id = $1 WHERE id = $2")
            .bind(empl_id)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a task
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every task of a project
    ///
    /// # Returns
    ///
    /// Number of tasks deleted
    pub async fn delete_by_project<'e, E>(executor: E, project_id: i64) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_conventional() {
        assert_eq!(TaskStatus::parse("todo"), TaskStatus::Todo);
        assert_eq!(TaskStatus::parse("in_progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::parse("done"), TaskStatus::Done);
        assert!(TaskStatus::Done.is_conventional());
    }

    #[test]
    fn test_status_unknown_round_trips() {
        let status = TaskStatus::parse("bogus-value");
        assert_eq!(status, TaskStatus::Other("bogus-value".to_string()));
        assert_eq!(status.as_str(), "bogus-value");
        assert!(!status.is_conventional());
    }

    #[test]
    fn test_status_is_case_sensitive() {
        assert_eq!(TaskStatus::parse("Done").to_string(), "Done");
        assert!(!TaskStatus::parse("Done").is_conventional());
    }

    #[test]
    fn test_create_task_defaults_to_absent() {
        let input: CreateTask = serde_json::from_value(serde_json::json!({
            "name": "Fix bug",
            "date": "2024-01-01",
            "projectId": 5,
            "status": "todo"
        }))
        .unwrap();

        assert_eq!(input.project_id, 5);
        assert!(input.descr.is_none());
        assert!(input.date_act.is_none());
        assert!(input.empl_id.is_none());
        assert!(input.priority.is_none());
    }

    #[test]
    fn test_create_task_requires_project_id() {
        let result: Result<CreateTask, _> = serde_json::from_value(serde_json::json!({
            "name": "Fix bug",
            "date": "2024-01-01",
            "status": "todo"
        }));
        assert!(result.is_err());
    }
}

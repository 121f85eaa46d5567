//! Storage port for users, projects, tasks and membership.
//!
//! Services talk to a `dyn Store` so the same rules run against PostgreSQL in
//! production and against [`MemoryStore`] in tests.
//!
//! Every method is a single logical operation. Operations that touch several
//! rows (project deletion, membership add) are atomic in both adapters.

use crate::models::{
    project::CreateProject,
    task::{CreateTask, Task, TaskWithAvatar},
    user::{CreateUser, User},
};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by storage adapters
#[derive(Debug, Error)]
pub enum StoreError {
    /// A row that had to exist did not
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness or reference constraint rejected the write
    #[error("{0}")]
    Constraint(String),

    /// PostgreSQL failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Any other adapter failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Rows touched by a cascading project deletion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectDeletion {
    /// Whether the project row existed
    pub project_deleted: bool,

    /// Tasks removed with the project
    pub tasks_deleted: u64,

    /// Membership entries removed from users
    pub memberships_removed: u64,
}

/// Persistence contract
#[async_trait]
pub trait Store: Send + Sync {
    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Inserts a user and returns the new ID
    ///
    /// # Errors
    ///
    /// Fails when the login is already taken.
    async fn insert_user(&self, data: CreateUser) -> StoreResult<i64>;

    /// Finds a user by ID, with membership aggregated
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    /// Finds a user by login, with membership aggregated
    async fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>>;

    /// Whether any user has this login
    async fn login_exists(&self, login: &str) -> StoreResult<bool>;

    /// Replaces a user's avatar; false if the user does not exist
    async fn update_avatar(&self, user_id: i64, avatar: Vec<u8>) -> StoreResult<bool>;

    /// Inserts a project and returns the new ID
    async fn insert_project(&self, data: CreateProject) -> StoreResult<i64>;

    /// Looks up a project name
    async fn project_name(&self, id: i64) -> StoreResult<Option<String>>;

    /// Deletes a project's tasks and membership entries, then the project, as
    /// one unit
    ///
    /// The membership step is the same removal as
    /// [`Store::remove_project_memberships`], run inside the unit.
    async fn delete_project_cascade(&self, id: i64) -> StoreResult<ProjectDeletion>;

    /// Adds a project to a user's membership set
    ///
    /// Returns false if the user already belonged to the project.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the user or the project does not exist.
    async fn add_membership(&self, user_id: i64, project_id: i64) -> StoreResult<bool>;

    /// Removes a project from a user's membership set; false if absent
    async fn remove_membership(&self, user_id: i64, project_id: i64) -> StoreResult<bool>;

    /// Removes a project from every user's membership set
    ///
    /// Standalone form of the membership step of
    /// [`Store::delete_project_cascade`], for callers that keep the project.
    async fn remove_project_memberships(&self, project_id: i64) -> StoreResult<u64>;

    /// A user's membership set, ascending
    async fn memberships(&self, user_id: i64) -> StoreResult<Vec<i64>>;

    /// Inserts a task and returns the new ID
    ///
    /// # Errors
    ///
    /// Fails when the project does not exist.
    async fn insert_task(&self, data: CreateTask) -> StoreResult<i64>;

    /// Finds a task by ID
    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>>;

    /// A project's tasks joined with each assignee's avatar, by task ID
    async fn tasks_by_project(&self, project_id: i64) -> StoreResult<Vec<TaskWithAvatar>>;

    /// Overwrites a task's status; false if the task does not exist
    async fn set_task_status(&self, id: i64, status: &str) -> StoreResult<bool>;

    /// Overwrites a task's assignee; false if the task does not exist
    async fn set_task_assignee(&self, id: i64, empl_id: &str) -> StoreResult<bool>;

    /// Deletes a task; false if it did not exist
    async fn delete_task(&self, id: i64) -> StoreResult<bool>;
}

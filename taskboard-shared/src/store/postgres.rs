//! PostgreSQL adapter for [`Store`].
//!
//! Single-row operations run directly on the pool. Multi-statement operations
//! open a transaction; any early return drops it, which rolls back.

use super::{ProjectDeletion, Store, StoreError, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    membership::Membership,
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskWithAvatar},
    user::{CreateUser, User},
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// [`Store`] backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, data: CreateUser) -> StoreResult<i64> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_login(&self.pool, login).await?)
    }

    async fn login_exists(&self, login: &str) -> StoreResult<bool> {
        Ok(User::login_exists(&self.pool, login).await?)
    }

    async fn update_avatar(&self, user_id: i64, avatar: Vec<u8>) -> StoreResult<bool> {
        Ok(User::update_avatar(&self.pool, user_id, &avatar).await?)
    }

    async fn insert_project(&self, data: CreateProject) -> StoreResult<i64> {
        Ok(Project::create(&self.pool, data).await?)
    }

    async fn project_name(&self, id: i64) -> StoreResult<Option<String>> {
        Ok(Project::find_name(&self.pool, id).await?)
    }

    async fn delete_project_cascade(&self, id: i64) -> StoreResult<ProjectDeletion> {
        let mut tx = self.pool.begin().await?;

        // Children first: the foreign keys would otherwise cascade them uncounted
        let tasks_deleted = Task::delete_by_project(&mut *tx, id).await?;
        let memberships_removed = Membership::remove_project(&mut *tx, id).await?;
        let project_deleted = Project::delete(&mut *tx, id).await?;

        tx.commit().await?;

        debug!(
            project_id = id,
            tasks_deleted,
            memberships_removed,
            "Project cascade committed"
        );

        Ok(ProjectDeletion {
            project_deleted,
            tasks_deleted,
            memberships_removed,
        })
    }

    async fn add_membership(&self, user_id: i64, project_id: i64) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        if !User::exists(&mut *tx, user_id).await? {
            return Err(StoreError::NotFound(format!("user {user_id} not found")));
        }
        if !Project::exists(&mut *tx, project_id).await? {
            return Err(StoreError::NotFound(format!("project {project_id} not found")));
        }

        let added = Membership::add(&mut *tx, user_id, project_id).await?;
        tx.commit().await?;

        Ok(added)
    }

    async fn remove_membership(&self, user_id: i64, project_id: i64) -> StoreResult<bool> {
        Ok(Membership::remove(&self.pool, user_id, project_id).await?)
    }

    async fn remove_project_memberships(&self, project_id: i64) -> StoreResult<u64> {
        Ok(Membership::remove_project(&self.pool, project_id).await?)
    }

    async fn memberships(&self, user_id: i64) -> StoreResult<Vec<i64>> {
        Ok(Membership::list_for_user(&self.pool, user_id).await?)
    }

    async fn insert_task(&self, data: CreateTask) -> StoreResult<i64> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn tasks_by_project(&self, project_id: i64) -> StoreResult<Vec<TaskWithAvatar>> {
        Ok(Task::list_by_project_with_avatar(&self.pool, project_id).await?)
    }

    async fn set_task_status(&self, id: i64, status: &str) -> StoreResult<bool> {
        Ok(Task::update_status(&self.pool, id, status).await?)
    }

    async fn set_task_assignee(&self, id: i64, empl_id: &str) -> StoreResult<bool> {
        Ok(Task::assign(&self.pool, id, empl_id).await?)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }
}

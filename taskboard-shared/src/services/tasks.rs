//! Task Lifecycle Manager.
//!
//! Status and assignee are overwritten unconditionally. Updates and deletes
//! aimed at a task that does not exist succeed without effect, the same as an
//! `UPDATE`/`DELETE` that matches no row.

use super::{ServiceError, ServiceResult};
use crate::models::task::{CreateTask, TaskStatus};
use crate::projection::{project_task, project_task_with_avatar, TaskResponse};
use crate::store::Store;
use tracing::{debug, info};

pub struct TaskLifecycle<'a> {
    store: &'a dyn Store,
}

impl<'a> TaskLifecycle<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Creates a task and returns its ID
    ///
    /// Optional fields left out of `input` are stored as absent.
    ///
    /// # Errors
    ///
    /// - `Validation` if the project ID is below 1
    /// - `Storage` if the project does not exist or the insert fails
    pub async fn create_task(&self, input: CreateTask) -> ServiceResult<i64> {
        if input.project_id < 1 {
            return Err(ServiceError::Validation(format!(
                "invalid projectId: {}",
                input.project_id
            )));
        }

        let project_id = input.project_id;
        let id = self.store.insert_task(input).await?;
        info!(task_id = id, project_id, "Task created");
        Ok(id)
    }

    /// Overwrites the status with any string
    pub async fn update_status(&self, task_id: i64, status: &str) -> ServiceResult<()> {
        if !TaskStatus::parse(status).is_conventional() {
            debug!(task_id, status, "Unconventional task status");
        }

        let updated = self.store.set_task_status(task_id, status).await?;
        debug!(task_id, status, updated, "Task status written");
        Ok(())
    }

    /// Overwrites the assignee; an empty ID unassigns
    pub async fn assign(&self, task_id: i64, employee_id: &str) -> ServiceResult<()> {
        let updated = self.store.set_task_assignee(task_id, employee_id).await?;
        debug!(task_id, employee_id, updated, "Task assignee written");
        Ok(())
    }

    /// Deletes a single task
    pub async fn delete_task(&self, task_id: i64) -> ServiceResult<()> {
        let deleted = self.store.delete_task(task_id).await?;
        info!(task_id, deleted, "Task delete applied");
        Ok(())
    }

    /// Every task of a project, by ID, with the assignee's avatar
    pub async fn list_by_project(&self, project_id: i64) -> ServiceResult<Vec<TaskResponse>> {
        let rows = self.store.tasks_by_project(project_id).await?;
        Ok(rows.into_iter().map(project_task_with_avatar).collect())
    }

    /// A single task; its avatar is always `null`
    ///
    /// # Errors
    ///
    /// `NotFound` if no task has this ID
    pub async fn get_by_id(&self, task_id: i64) -> ServiceResult<TaskResponse> {
        self.store
            .find_task(task_id)
            .await?
            .map(project_task)
            .ok_or_else(|| ServiceError::NotFound(format!("task {task_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{project::CreateProject, user::CreateUser};
    use crate::store::MemoryStore;

    async fn project(store: &MemoryStore) -> i64 {
        store
            .insert_project(CreateProject { name: "Board".to_string() })
            .await
            .unwrap()
    }

    fn minimal(project_id: i64) -> CreateTask {
        CreateTask {
            name: "Fix bug".to_string(),
            date: "2024-01-01".to_string(),
            project_id,
            status: "todo".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_created_task_lists_with_empty_optionals() {
        let store = MemoryStore::new();
        let project_id = project(&store).await;
        let tasks = TaskLifecycle::new(&store);

        let id = tasks.create_task(minimal(project_id)).await.unwrap();
        let listed = tasks.list_by_project(project_id).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].descr, "");
        assert_eq!(listed[0].empl_id, "");
        assert_eq!(listed[0].priority, "");
        assert_eq!(listed[0].avatar, None);
    }

    #[tokio::test]
    async fn test_project_id_below_one_is_rejected() {
        let store = MemoryStore::new();
        let result = TaskLifecycle::new(&store).create_task(minimal(0)).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_project_is_a_storage_error() {
        let store = MemoryStore::new();
        let result = TaskLifecycle::new(&store).create_task(minimal(99)).await;
        assert!(matches!(result, Err(ServiceError::Storage(_))));
    }

    #[tokio::test]
    async fn test_status_accepts_any_string() {
        let store = MemoryStore::new();
        let project_id = project(&store).await;
        let tasks = TaskLifecycle::new(&store);
        let id = tasks.create_task(minimal(project_id)).await.unwrap();

        tasks.update_status(id, "done").await.unwrap();
        assert_eq!(tasks.get_by_id(id).await.unwrap().status, "done");

        tasks.update_status(id, "bogus-value").await.unwrap();
        assert_eq!(tasks.get_by_id(id).await.unwrap().status, "bogus-value");
    }

    #[tokio::test]
    async fn test_assign_then_unassign() {
        let store = MemoryStore::new();
        let project_id = project(&store).await;
        let tasks = TaskLifecycle::new(&store);
        let id = tasks.create_task(minimal(project_id)).await.unwrap();

        tasks.assign(id, "17").await.unwrap();
        assert_eq!(tasks.get_by_id(id).await.unwrap().empl_id, "17");

        tasks.assign(id, "").await.unwrap();
        assert_eq!(tasks.get_by_id(id).await.unwrap().empl_id, "");
    }

    #[tokio::test]
    async fn test_listing_carries_assignee_avatar() {
        let store = MemoryStore::new();
        let project_id = project(&store).await;
        let user = store
            .insert_user(CreateUser {
                name: "Ada".to_string(),
                role: "employee".to_string(),
                code: "INV".to_string(),
                login: "ada".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        store.update_avatar(user, b"img".to_vec()).await.unwrap();

        let tasks = TaskLifecycle::new(&store);
        let id = tasks.create_task(minimal(project_id)).await.unwrap();
        tasks.assign(id, &user.to_string()).await.unwrap();

        let listed = tasks.list_by_project(project_id).await.unwrap();
        assert_eq!(listed[0].avatar, Some(b"img".to_vec()));
        assert_eq!(tasks.get_by_id(id).await.unwrap().avatar, None);
    }

    #[tokio::test]
    async fn test_missing_task_is_not_found() {
        let store = MemoryStore::new();
        let result = TaskLifecycle::new(&store).get_by_id(404).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_is_unconditional() {
        let store = MemoryStore::new();
        let project_id = project(&store).await;
        let tasks = TaskLifecycle::new(&store);
        let id = tasks.create_task(minimal(project_id)).await.unwrap();

        tasks.delete_task(id).await.unwrap();
        tasks.delete_task(id).await.unwrap();

        assert!(tasks.list_by_project(project_id).await.unwrap().is_empty());
    }
}

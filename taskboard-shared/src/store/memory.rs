//! In-memory adapter for [`Store`].
//!
//! Mirrors the PostgreSQL schema: unique logins, tasks referencing existing
//! projects, membership as a set of `(user_id, project_id)` pairs. One write
//! lock covers each operation, so cascades are atomic. Used by the test
//! suites and for running the API without a database.

use super::{ProjectDeletion, Store, StoreError, StoreResult};
use crate::models::{
    project::CreateProject,
    task::{CreateTask, Task, TaskWithAvatar},
    user::{CreateUser, User},
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_user_id: i64,
    last_project_id: i64,
    last_task_id: i64,
    users: BTreeMap<i64, StoredUser>,
    projects: BTreeMap<i64, String>,
    tasks: BTreeMap<i64, Task>,
    memberships: BTreeSet<(i64, i64)>,
}

#[derive(Debug, Clone)]
struct StoredUser {
    name: String,
    role: String,
    code: String,
    login: String,
    password: String,
    avatar: Option<Vec<u8>>,
}

impl MemoryState {
    fn memberships_of(&self, user_id: i64) -> Vec<i64> {
        self.memberships
            .range((user_id, i64::MIN)..=(user_id, i64::MAX))
            .map(|(_, project_id)| *project_id)
            .collect()
    }

    fn drop_project_memberships(&mut self, project_id: i64) -> u64 {
        let before = self.memberships.len();
        self.memberships.retain(|(_, member_of)| *member_of != project_id);
        (before - self.memberships.len()) as u64
    }

    fn user_record(&self, id: i64, stored: &StoredUser) -> User {
        User {
            id,
            name: stored.name.clone(),
            role: stored.role.clone(),
            code: stored.code.clone(),
            login: stored.login.clone(),
            password: stored.password.clone(),
            projects_ids: self.memberships_of(id),
            avatar: stored.avatar.clone(),
        }
    }

    /// Same rule as `LEFT JOIN users u ON u.id::text = t.empl_id`
    fn assignee_avatar(&self, task: &Task) -> Option<Vec<u8>> {
        let empl_id = task.empl_id.as_deref()?;
        self.users
            .iter()
            .find(|(id, _)| id.to_string() == empl_id)
            .and_then(|(_, user)| user.avatar.clone())
    }
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|err| StoreError::Backend(err.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|err| StoreError::Backend(err.to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }

    async fn insert_user(&self, data: CreateUser) -> StoreResult<i64> {
        let mut state = self.write()?;
        if state.users.values().any(|user| user.login == data.login) {
            return Err(StoreError::Constraint(format!(
                "login {} is already registered",
                data.login
            )));
        }

        state.last_user_id += 1;
        let id = state.last_user_id;
        state.users.insert(
            id,
            StoredUser {
                name: data.name,
                role: data.role,
                code: data.code,
                login: data.login,
                password: data.password,
                avatar: None,
            },
        );
        Ok(id)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let state = self.read()?;
        Ok(state.users.get(&id).map(|user| state.user_record(id, user)))
    }

    async fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let state = self.read()?;
        Ok(state
            .users
            .iter()
            .find(|(_, user)| user.login == login)
            .map(|(id, user)| state.user_record(*id, user)))
    }

    async fn login_exists(&self, login: &str) -> StoreResult<bool> {
        let state = self.read()?;
        Ok(state.users.values().any(|user| user.login == login))
    }

    async fn update_avatar(&self, user_id: i64, avatar: Vec<u8>) -> StoreResult<bool> {
        let mut state = self.write()?;
        match state.users.get_mut(&user_id) {
            Some(user) => {
                user.avatar = Some(avatar);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_project(&self, data: CreateProject) -> StoreResult<i64> {
        let mut state = self.write()?;
        state.last_project_id += 1;
        let id = state.last_project_id;
        state.projects.insert(id, data.name);
        Ok(id)
    }

    async fn project_name(&self, id: i64) -> StoreResult<Option<String>> {
        let state = self.read()?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn delete_project_cascade(&self, id: i64) -> StoreResult<ProjectDeletion> {
        let mut state = self.write()?;

        let before = state.tasks.len();
        state.tasks.retain(|_, task| task.project_id != id);
        let tasks_deleted = (before - state.tasks.len()) as u64;

        let memberships_removed = state.drop_project_memberships(id);
        let project_deleted = state.projects.remove(&id).is_some();

        Ok(ProjectDeletion {
            project_deleted,
            tasks_deleted,
            memberships_removed,
        })
    }

    async fn add_membership(&self, user_id: i64, project_id: i64) -> StoreResult<bool> {
        let mut state = self.write()?;
        if !state.users.contains_key(&user_id) {
            return Err(StoreError::NotFound(format!("user {user_id} not found")));
        }
        if !state.projects.contains_key(&project_id) {
            return Err(StoreError::NotFound(format!("project {project_id} not found")));
        }
        Ok(state.memberships.insert((user_id, project_id)))
    }

    async fn remove_membership(&self, user_id: i64, project_id: i64) -> StoreResult<bool> {
        let mut state = self.write()?;
        Ok(state.memberships.remove(&(user_id, project_id)))
    }

    async fn remove_project_memberships(&self, project_id: i64) -> StoreResult<u64> {
        Ok(self.write()?.drop_project_memberships(project_id))
    }

    async fn memberships(&self, user_id: i64) -> StoreResult<Vec<i64>> {
        let state = self.read()?;
        Ok(state.memberships_of(user_id))
    }

    async fn insert_task(&self, data: CreateTask) -> StoreResult<i64> {
        let mut state = self.write()?;
        if !state.projects.contains_key(&data.project_id) {
            return Err(StoreError::Constraint(format!(
                "project {} does not exist",
                data.project_id
            )));
        }

        state.last_task_id += 1;
        let id = state.last_task_id;
        state.tasks.insert(
            id,
            Task {
                id,
                name: data.name,
                descr: data.descr,
                date: data.date,
                date_act: data.date_act,
                empl_id: data.empl_id,
                project_id: data.project_id,
                status: data.status,
                priority: data.priority,
            },
        );
        Ok(id)
    }

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn tasks_by_project(&self, project_id: i64) -> StoreResult<Vec<TaskWithAvatar>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.project_id == project_id)
            .map(|task| TaskWithAvatar {
                task: task.clone(),
                avatar: state.assignee_avatar(task),
            })
            .collect())
    }

    async fn set_task_status(&self, id: i64, status: &str) -> StoreResult<bool> {
        let mut state = self.write()?;
        match state.tasks.get_mut(&id) {
            Some(task) => {
                task.status = status.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_task_assignee(&self, id: i64, empl_id: &str) -> StoreResult<bool> {
        let mut state = self.write()?;
        match state.tasks.get_mut(&id) {
            Some(task) => {
                task.empl_id = Some(empl_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.write()?;
        Ok(state.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(login: &str) -> CreateUser {
        CreateUser {
            name: "Test User".to_string(),
            role: "employee".to_string(),
            code: "INV".to_string(),
            login: login.to_string(),
            password: "pw".to_string(),
        }
    }

    fn task(project_id: i64) -> CreateTask {
        CreateTask {
            name: "Task".to_string(),
            date: "2024-01-01".to_string(),
            project_id,
            status: "todo".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_duplicate_login_rejected() {
        let store = MemoryStore::new();
        store.insert_user(user("ada")).await.unwrap();

        let result = store.insert_user(user("ada")).await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_task_requires_existing_project() {
        let store = MemoryStore::new();
        let result = store.insert_task(task(42)).await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_memberships_are_per_user_and_sorted() {
        let store = MemoryStore::new();
        let ada = store.insert_user(user("ada")).await.unwrap();
        let bob = store.insert_user(user("bob")).await.unwrap();
        let p1 = store.insert_project(CreateProject { name: "A".into() }).await.unwrap();
        let p2 = store.insert_project(CreateProject { name: "B".into() }).await.unwrap();

        store.add_membership(ada, p2).await.unwrap();
        store.add_membership(ada, p1).await.unwrap();
        store.add_membership(bob, p2).await.unwrap();

        assert_eq!(store.memberships(ada).await.unwrap(), vec![p1, p2]);
        assert_eq!(store.memberships(bob).await.unwrap(), vec![p2]);
    }

    #[tokio::test]
    async fn test_assignee_avatar_join() {
        let store = MemoryStore::new();
        let ada = store.insert_user(user("ada")).await.unwrap();
        store.update_avatar(ada, vec![1, 2, 3]).await.unwrap();
        let project = store.insert_project(CreateProject { name: "A".into() }).await.unwrap();

        let assigned = store
            .insert_task(CreateTask {
                empl_id: Some(ada.to_string()),
                ..task(project)
            })
            .await
            .unwrap();
        let dangling = store
            .insert_task(CreateTask {
                empl_id: Some("999".to_string()),
                ..task(project)
            })
            .await
            .unwrap();
        let unassigned = store.insert_task(task(project)).await.unwrap();

        let listed = store.tasks_by_project(project).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|row| row.task.id).collect();
        assert_eq!(ids, vec![assigned, dangling, unassigned]);
        assert_eq!(listed[0].avatar, Some(vec![1, 2, 3]));
        assert_eq!(listed[1].avatar, None);
        assert_eq!(listed[2].avatar, None);
    }

    #[tokio::test]
    async fn test_cascade_counts() {
        let store = MemoryStore::new();
        let ada = store.insert_user(user("ada")).await.unwrap();
        let project = store.insert_project(CreateProject { name: "A".into() }).await.unwrap();
        store.insert_task(task(project)).await.unwrap();
        store.insert_task(task(project)).await.unwrap();
        store.add_membership(ada, project).await.unwrap();

        let deletion = store.delete_project_cascade(project).await.unwrap();
        assert_eq!(
            deletion,
            ProjectDeletion {
                project_deleted: true,
                tasks_deleted: 2,
                memberships_removed: 1,
            }
        );
    }
}

//! Project operations.

use super::{ServiceError, ServiceResult};
use crate::models::project::CreateProject;
use crate::store::{ProjectDeletion, Store};
use std::collections::BTreeMap;
use tracing::info;

pub struct ProjectService<'a> {
    store: &'a dyn Store,
}

impl<'a> ProjectService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Creates a project and returns its ID
    pub async fn create_project(&self, name: String) -> ServiceResult<i64> {
        let id = self.store.insert_project(CreateProject { name }).await?;
        info!(project_id = id, "Project created");
        Ok(id)
    }

    /// Names for the given IDs
    ///
    /// Duplicate IDs collapse into one entry.
    ///
    /// # Errors
    ///
    /// `NotFound` on the first ID with no project
    pub async fn project_names(&self, ids: &[i64]) -> ServiceResult<BTreeMap<i64, String>> {
        let mut names = BTreeMap::new();
        for &id in ids {
            if names.contains_key(&id) {
                continue;
            }
            let name = self
                .store
                .project_name(id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("project {id} not found")))?;
            names.insert(id, name);
        }
        Ok(names)
    }

    /// Deletes the project, its tasks and every membership in it, atomically
    ///
    /// Deleting a project that does not exist is a no-op.
    pub async fn delete_project(&self, project_id: i64) -> ServiceResult<ProjectDeletion> {
        let deletion = self.store.delete_project_cascade(project_id).await?;
        info!(
            project_id,
            existed = deletion.project_deleted,
            tasks_deleted = deletion.tasks_deleted,
            memberships_removed = deletion.memberships_removed,
            "Project deleted"
        );
        Ok(deletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{task::CreateTask, user::CreateUser};
    use crate::services::{membership::MembershipManager, tasks::TaskLifecycle};
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_project_names() {
        let store = MemoryStore::new();
        let projects = ProjectService::new(&store);
        let alpha = projects.create_project("Alpha".to_string()).await.unwrap();
        let beta = projects.create_project("Beta".to_string()).await.unwrap();

        let names = projects.project_names(&[beta, alpha, beta]).await.unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[&alpha], "Alpha");
        assert_eq!(names[&beta], "Beta");

        assert!(projects.project_names(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_project_name_is_not_found() {
        let store = MemoryStore::new();
        let projects = ProjectService::new(&store);
        let alpha = projects.create_project("Alpha".to_string()).await.unwrap();

        let result = projects.project_names(&[alpha, 77]).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_leaves_no_orphans() {
        let store = MemoryStore::new();
        let projects = ProjectService::new(&store);
        let keep = projects.create_project("Keep".to_string()).await.unwrap();
        let doomed = projects.create_project("Doomed".to_string()).await.unwrap();

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
        let membership = MembershipManager::new(&store);
        membership.add_membership(user, keep).await.unwrap();
        membership.add_membership(user, doomed).await.unwrap();

        let tasks = TaskLifecycle::new(&store);
        for project_id in [keep, doomed, doomed] {
            tasks
                .create_task(CreateTask {
                    name: "t".to_string(),
                    date: "2024-01-01".to_string(),
                    project_id,
                    status: "todo".to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let deletion = projects.delete_project(doomed).await.unwrap();
        assert!(deletion.project_deleted);
        assert_eq!(deletion.tasks_deleted, 2);
        assert_eq!(deletion.memberships_removed, 1);

        assert!(tasks.list_by_project(doomed).await.unwrap().is_empty());
        assert_eq!(tasks.list_by_project(keep).await.unwrap().len(), 1);
        assert_eq!(membership.list_memberships(user).await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_delete_missing_project_is_noop() {
        let store = MemoryStore::new();
        let deletion = ProjectService::new(&store).delete_project(5).await.unwrap();
        assert_eq!(deletion, ProjectDeletion::default());
    }
}

//! Membership Manager: which projects a user belongs to.
//!
//! Membership behaves as a set. Adding an existing member and removing a
//! non-member are both no-ops, so every operation here is idempotent.

use super::ServiceResult;
use crate::store::Store;
use tracing::{debug, info};

/// User ↔ project membership operations
pub struct MembershipManager<'a> {
    store: &'a dyn Store,
}

impl<'a> MembershipManager<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Adds `project_id` to the user's set
    ///
    /// The existence checks and the insert are one atomic unit.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user or the project does not exist.
    pub async fn add_membership(&self, user_id: i64, project_id: i64) -> ServiceResult<()> {
        let added = self.store.add_membership(user_id, project_id).await?;
        if added {
            info!(user_id, project_id, "Project added to user");
        } else {
            debug!(user_id, project_id, "User already belongs to project");
        }
        Ok(())
    }

    /// Removes `project_id` from the user's set; a non-member is a no-op
    pub async fn remove_membership(&self, user_id: i64, project_id: i64) -> ServiceResult<()> {
        let removed = self.store.remove_membership(user_id, project_id).await?;
        debug!(user_id, project_id, removed, "Membership removal applied");
        Ok(())
    }

    /// Removes `project_id` from every user's set
    ///
    /// Standalone operation: project deletion already runs this removal inside
    /// its own transaction, see [`Store::delete_project_cascade`].
    ///
    /// # Returns
    ///
    /// Number of users that lost the membership
    pub async fn cascade_remove_project(&self, project_id: i64) -> ServiceResult<u64> {
        let removed = self.store.remove_project_memberships(project_id).await?;
        info!(project_id, removed, "Project removed from all users");
        Ok(removed)
    }

    /// The user's current set, ascending
    pub async fn list_memberships(&self, user_id: i64) -> ServiceResult<Vec<i64>> {
        Ok(self.store.memberships(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{project::CreateProject, user::CreateUser};
    use crate::services::ServiceError;
    use crate::store::MemoryStore;

    async fn seed(store: &MemoryStore) -> (i64, i64, i64) {
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
        let first = store
            .insert_project(CreateProject { name: "First".to_string() })
            .await
            .unwrap();
        let second = store
            .insert_project(CreateProject { name: "Second".to_string() })
            .await
            .unwrap();
        (user, first, second)
    }

    #[tokio::test]
    async fn test_add_then_remove_restores_original_set() {
        let store = MemoryStore::new();
        let (user, first, second) = seed(&store).await;
        let manager = MembershipManager::new(&store);

        manager.add_membership(user, first).await.unwrap();
        let original = manager.list_memberships(user).await.unwrap();

        manager.add_membership(user, second).await.unwrap();
        assert_eq!(manager.list_memberships(user).await.unwrap(), vec![first, second]);

        manager.remove_membership(user, second).await.unwrap();
        assert_eq!(manager.list_memberships(user).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemoryStore::new();
        let (user, first, _) = seed(&store).await;
        let manager = MembershipManager::new(&store);

        manager.add_membership(user, first).await.unwrap();
        manager.remove_membership(user, first).await.unwrap();
        manager.remove_membership(user, first).await.unwrap();

        assert!(manager.list_memberships(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let store = MemoryStore::new();
        let (user, first, _) = seed(&store).await;
        let manager = MembershipManager::new(&store);

        manager.add_membership(user, first).await.unwrap();
        manager.add_membership(user, first).await.unwrap();

        assert_eq!(manager.list_memberships(user).await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_add_for_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let (_, first, _) = seed(&store).await;
        let manager = MembershipManager::new(&store);

        let result = manager.add_membership(404, first).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cascade_removes_from_every_user() {
        let store = MemoryStore::new();
        let (ada, first, second) = seed(&store).await;
        let bob = store
            .insert_user(CreateUser {
                name: "Bob".to_string(),
                role: "admin".to_string(),
                code: "INV".to_string(),
                login: "bob".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        let manager = MembershipManager::new(&store);

        manager.add_membership(ada, first).await.unwrap();
        manager.add_membership(ada, second).await.unwrap();
        manager.add_membership(bob, first).await.unwrap();

        let removed = manager.cascade_remove_project(first).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(manager.list_memberships(ada).await.unwrap(), vec![second]);
        assert!(manager.list_memberships(bob).await.unwrap().is_empty());
        assert_eq!(store.project_name(first).await.unwrap().as_deref(), Some("First"));
    }
}

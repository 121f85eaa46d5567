//! Business operations over a [`Store`](crate::store::Store).
//!
//! Each service is a thin borrow of the store, built per request:
//!
//! ```no_run
//! use taskboard_shared::services::tasks::TaskLifecycle;
//! use taskboard_shared::store::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let task = TaskLifecycle::new(&store).get_by_id(7).await?;
//! # Ok(())
//! # }
//! ```

use crate::auth::password::PasswordError;
use crate::store::StoreError;
use thiserror::Error;

pub mod membership;
pub mod projects;
pub mod tasks;
pub mod users;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the services
///
/// The HTTP layer maps `Validation` to 400, `Authentication` to 401, and both
/// `NotFound` and `Storage` to 500.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// Credential mismatch
    #[error("{0}")]
    Authentication(String),

    /// A single expected row was missing
    #[error("{0}")]
    NotFound(String),

    /// Any other persistence failure
    #[error(transparent)]
    Storage(StoreError),

    /// Password hashing failure
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => ServiceError::NotFound(message),
            other => ServiceError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_is_preserved() {
        let err: ServiceError = StoreError::NotFound("user 3 not found".to_string()).into();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.to_string(), "user 3 not found");
    }

    #[test]
    fn test_other_store_errors_are_storage() {
        let err: ServiceError = StoreError::Backend("lock poisoned".to_string()).into();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert_eq!(err.to_string(), "storage backend error: lock poisoned");
    }
}

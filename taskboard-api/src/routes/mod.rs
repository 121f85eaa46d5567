/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Login, registration, login availability
/// - `projects`: Project names, creation, task listing, cascading delete
/// - `tasks`: Task creation, lookup, status, assignment, deletion
/// - `profile`: Profile, avatar, project membership

pub mod auth;
pub mod health;
pub mod profile;
pub mod projects;
pub mod tasks;

use crate::error::ApiError;
use axum::extract::{rejection::PathRejection, Path};
use serde::{Deserialize, Serialize};

/// `{"message": "..."}` body shared by every mutation
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Unwraps an integer `:id` path segment, 400 when it is not one
pub(crate) fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    let Path(id) = path?;
    Ok(id)
}

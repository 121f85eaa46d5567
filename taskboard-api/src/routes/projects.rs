/// Project endpoints
///
/// - `GET /projects/?ids=1,2,3` - Names for a list of project IDs
/// - `POST /projects/new` - Create a project
/// - `GET /projects/:id/tasks` - A project's tasks with assignee avatars
/// - `DELETE /projects/:id` - Delete a project with its tasks and memberships

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{path_id, MessageResponse},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use taskboard_shared::projection::TaskResponse;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ProjectIdsQuery {
    #[serde(default)]
    pub ids: String,
}

/// Project names keyed by ID
///
/// JSON object keys are strings, so `{1: "Alpha"}` is sent as `{"1": "Alpha"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectNamesResponse {
    pub projects: BTreeMap<i64, String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "Project name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectTasksResponse {
    pub tasks: Vec<TaskResponse>,
}

/// Comma-separated integer IDs; an empty list is rejected
fn parse_ids(raw: &str) -> Result<Vec<i64>, ApiError> {
    raw.split(',')
        .map(|piece| {
            piece
                .parse::<i64>()
                .map_err(|_| ApiError::BadRequest("invalid id".to_string()))
        })
        .collect()
}

/// Names for the projects in `ids`
///
/// # Errors
///
/// - `400 Bad Request`: `ids` missing, empty, or holding a non-integer
/// - `500 Internal Server Error`: An ID with no project
pub async fn project_names(
    State(state): State<AppState>,
    query: Result<Query<ProjectIdsQuery>, QueryRejection>,
) -> ApiResult<Json<ProjectNamesResponse>> {
    let Query(query) = query?;
    let ids = parse_ids(&query.ids)?;
    let projects = state.projects().project_names(&ids).await?;
    Ok(Json(ProjectNamesResponse { projects }))
}

pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    state.projects().create_project(req.name).await?;
    Ok(Json(MessageResponse::new("Project added")))
}

/// Tasks of one project, ordered by ID
pub async fn project_tasks(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ProjectTasksResponse>> {
    let project_id = path_id(path)?;
    let tasks = state.tasks().list_by_project(project_id).await?;
    Ok(Json(ProjectTasksResponse { tasks }))
}

/// Delete a project
///
/// Its tasks and every user's membership in it go in the same transaction.
/// Deleting an unknown project succeeds.
pub async fn delete_project(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let project_id = path_id(path)?;
    state.projects().delete_project(project_id).await?;
    Ok(Json(MessageResponse::new("Project deleted")))
}

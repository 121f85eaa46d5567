/// Task endpoints
///
/// - `POST /tasks/new` - Create a task
/// - `GET /tasks/:id` - Fetch a task
/// - `DELETE /tasks/:id` - Delete a task
/// - `POST /tasks/:id/updateStatus` - Overwrite the status
/// - `POST /tasks/:id/assign?empl_id=` - Overwrite the assignee

use crate::{
    app::AppState,
    error::ApiResult,
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
use taskboard_shared::{models::task::CreateTask, projection::TaskResponse};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignQuery {
    #[serde(default)]
    pub empl_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub task: TaskResponse,
}

/// Create a task
///
/// `descr`, `date_act`, `empl_id` and `priority` may be omitted or `null`;
/// they are then stored as absent.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, or `projectId` missing, non-integer
///   or below 1
/// - `500 Internal Server Error`: Unknown project, or storage failure
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(task) = payload?;
    state.tasks().create_task(task).await?;
    Ok(Json(MessageResponse::new("Task added")))
}

/// Fetch one task; its `avatar` is always `null`
pub async fn get_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<TaskEnvelope>> {
    let task_id = path_id(path)?;
    let task = state.tasks().get_by_id(task_id).await?;
    Ok(Json(TaskEnvelope { task }))
}

pub async fn delete_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = path_id(path)?;
    state.tasks().delete_task(task_id).await?;
    Ok(Json(MessageResponse::new("Task deleted")))
}

/// Overwrite the status with any string
pub async fn update_status(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = path_id(path)?;
    let Json(req) = payload?;

    state.tasks().update_status(task_id, &req.status).await?;
    Ok(Json(MessageResponse::new("Task status updated")))
}

/// Overwrite the assignee; a missing or empty `empl_id` unassigns
pub async fn assign_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<AssignQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = path_id(path)?;
    let Query(query) = query?;

    state.tasks().assign(task_id, &query.empl_id).await?;
    Ok(Json(MessageResponse::new("Task assigned")))
}

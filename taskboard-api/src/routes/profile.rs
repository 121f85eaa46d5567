/// Profile endpoints
///
/// - `GET /profile/:id` - Profile with login and password blanked
/// - `POST /profile/:id/updateAvatar` - Replace the avatar
/// - `POST /profile/:id/addProject?project_id=` - Join a project
/// - `DELETE /profile/:id/removeProject?project_id=` - Leave a project

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
use taskboard_shared::projection::UserResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
}

/// `{"avatar": "<standard base64>"}`
#[derive(Debug, Deserialize)]
pub struct UpdateAvatarRequest {
    pub avatar: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub project_id: i64,
}

/// Fetch a profile; `avatar` carries the raw image bytes
pub async fn get_profile(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ProfileResponse>> {
    let user_id = path_id(path)?;
    let user = state.users().profile(user_id).await?;
    Ok(Json(ProfileResponse { user }))
}

/// Replace the avatar
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or invalid base64
/// - `500 Internal Server Error`: Unknown user, or storage failure
pub async fn update_avatar(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateAvatarRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let user_id = path_id(path)?;
    let Json(req) = payload?;

    state.users().update_avatar(user_id, &req.avatar).await?;
    Ok(Json(MessageResponse::new("Avatar updated")))
}

/// Add a project to the user's memberships; already a member is a no-op
///
/// # Errors
///
/// - `400 Bad Request`: `project_id` missing or not an integer
/// - `500 Internal Server Error`: Unknown user or project
pub async fn add_project(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let user_id = path_id(path)?;
    let Query(query) = query?;

    state
        .membership()
        .add_membership(user_id, query.project_id)
        .await?;
    Ok(Json(MessageResponse::new("Project added to user")))
}

/// Remove a project from the user's memberships; not a member is a no-op
pub async fn remove_project(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ProjectQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let user_id = path_id(path)?;
    let Query(query) = query?;

    state
        .membership()
        .remove_membership(user_id, query.project_id)
        .await?;
    Ok(Json(MessageResponse::new("Project removed from user")))
}

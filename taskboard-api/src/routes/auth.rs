/// Authentication endpoints
///
/// - `POST /auth/login` - Check credentials, return the user
/// - `POST /auth/register` - Create a user
/// - `GET /auth/register/check/:login` - Whether a login is taken

use crate::{
    app::AppState,
    error::ApiResult,
    routes::MessageResponse,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{models::user::CreateUser, projection::UserResponse};
use validator::Validate;

/// Register request
///
/// Any other user fields in the body (`id`, `projects_ids`, `avatar`) are
/// ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    pub name: String,

    pub role: String,

    pub code: String,

    #[validate(length(min = 1, message = "Login must not be empty"))]
    pub login: String,

    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserResponse,
}

/// Log in
///
/// ```text
/// POST /auth/login
///
/// { "login": "ada", "password": "secret" }
/// ```
///
/// The returned user echoes the submitted login and password. Its `avatar`
/// is the base64 text of the image, base64-encoded again by JSON.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `401 Unauthorized`: Unknown login or wrong password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    let user = state.users().login(&req.login, &req.password).await?;
    Ok(Json(LoginResponse { user }))
}

/// Register a new user
///
/// ```text
/// POST /auth/register
///
/// { "name": "Ada", "role": "employee", "code": "INV-1", "login": "ada", "password": "secret" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or empty login
/// - `500 Internal Server Error`: Login already taken, or storage failure
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    state
        .users()
        .register(CreateUser {
            name: req.name,
            role: req.role,
            code: req.code,
            login: req.login,
            password: req.password,
        })
        .await?;

    Ok(Json(MessageResponse::new("User registered")))
}

/// Check whether a login is already registered
pub async fn check_login(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let message = if state.users().is_login_taken(&login).await? {
        "Login exists"
    } else {
        "Login is free"
    };
    Ok(Json(MessageResponse::new(message)))
}

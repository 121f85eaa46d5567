//! Storage-shaped records to wire-shaped responses.
//!
//! Optional text renders through [`normalize`], so the wire never carries
//! `null` for `descr`, `date_act`, `empl_id` or `priority`.
//!
//! Byte fields are written as standard base64 strings, and a missing payload is
//! `null`. [`AvatarEncoding`] decides what the bytes are before that step:
//! the raw image, or the image's base64 text. Login uses the latter, so its JSON
//! string is base64 applied twice; profile and task listing use the former.

use crate::models::{
    nullable::{normalize, NullableText},
    task::{Task, TaskWithAvatar},
    user::User,
};
use serde::{Deserialize, Serialize};

/// What the avatar bytes in a response hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarEncoding {
    /// The image bytes as stored
    Binary,

    /// The ASCII of the image's standard base64 encoding
    ///
    /// A user without an avatar gets an empty payload, not `null`.
    Base64Text,
}

impl AvatarEncoding {
    fn apply(self, avatar: Option<Vec<u8>>) -> Option<Vec<u8>> {
        match self {
            AvatarEncoding::Binary => avatar,
            AvatarEncoding::Base64Text => {
                let bytes = avatar.unwrap_or_default();
                Some(base64_bytes::encode(&bytes).into_bytes())
            }
        }
    }
}

/// Task as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: i64,
    pub name: String,
    pub descr: String,
    pub date: String,
    pub date_act: String,
    pub empl_id: String,
    #[serde(with = "base64_bytes")]
    pub avatar: Option<Vec<u8>>,
    #[serde(rename = "projectId")]
    pub project_id: i64,
    pub status: String,
    pub priority: String,
}

/// User as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub code: String,
    pub login: String,
    pub password: String,
    pub projects_ids: Vec<i64>,
    #[serde(with = "base64_bytes")]
    pub avatar: Option<Vec<u8>>,
}

/// Projects a bare task; the avatar is `null`
pub fn project_task(task: Task) -> TaskResponse {
    project_with(task, None)
}

/// Projects a task joined with its assignee's avatar
pub fn project_task_with_avatar(row: TaskWithAvatar) -> TaskResponse {
    project_with(row.task, row.avatar)
}

fn project_with(task: Task, avatar: Option<Vec<u8>>) -> TaskResponse {
    TaskResponse {
        id: task.id,
        name: task.name,
        descr: task.descr.normalized(),
        date: task.date,
        date_act: task.date_act.normalized(),
        empl_id: normalize(task.empl_id.as_deref()),
        avatar,
        project_id: task.project_id,
        status: task.status,
        priority: task.priority.normalized(),
    }
}

/// Projects a user with the given avatar encoding
pub fn project_user(user: User, encoding: AvatarEncoding) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        role: user.role,
        code: user.code,
        login: user.login,
        password: user.password,
        projects_ids: user.projects_ids,
        avatar: encoding.apply(user.avatar),
    }
}

/// Serde adapter: `Option<Vec<u8>>` as a standard base64 string or `null`
pub mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn encode(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_str(&encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => STANDARD.decode(text).map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}

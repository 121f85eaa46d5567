/// User model and database operations
///
/// Users carry their credentials, a free-text role, an invitation code and an
/// optional avatar image. Project membership lives in the `user_projects` join
/// table (see [`crate::models::membership`]); the `projects_ids` field is
/// aggregated from it on every read.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     role TEXT NOT NULL,
///     code TEXT NOT NULL,
///     login TEXT NOT NULL UNIQUE,
///     password TEXT NOT NULL,
///     avatar BYTEA
/// );
/// ```
///
/// # Credentials
///
/// The `password` column holds whatever the configured
/// [`CredentialScheme`](crate::auth::password::CredentialScheme) produced. With
/// the default `plaintext` scheme that is the password itself, which is
/// insecure and kept only for compatibility with existing data.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let id = User::create(&pool, CreateUser {
///     name: "Ada".to_string(),
///     role: "employee".to_string(),
///     code: "INV-1".to_string(),
///     login: "ada".to_string(),
///     password: "secret".to_string(),
/// }).await?;
///
/// let found = User::find_by_id(&pool, id).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// User record as stored, with membership aggregated into `projects_ids`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Free-text classification, e.g. "admin" or "employee"
    pub role: String,

    /// Opaque invitation/reference code
    pub code: String,

    /// Login name, unique across users
    pub login: String,

    /// Stored credential (see module docs)
    pub password: String,

    /// Projects this user belongs to, ascending
    pub projects_ids: Vec<i64>,

    /// Avatar image bytes (None if never uploaded)
    pub avatar: Option<Vec<u8>>,
}

/// Input for registering a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub role: String,
    pub code: String,
    pub login: String,
    pub password: String,
}

const SELECT_USER: &str = r#"
    SELECT u.id, u.name, u.role, u.code, u.login, u.password,
           ARRAY(
               SELECT up.project_id FROM user_projects up
               WHERE up.user_id = u.id
               ORDER BY up.project_id
           ) AS projects_ids,
           u.avatar
    FROM users u
"#;

impl User {
    /// Inserts a new user and returns its ID
    ///
    /// New users start with no avatar and no project membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the login is already taken (unique constraint) or
    /// the database connection fails
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, role, code, login, password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(data.name)
        .bind(data.role)
        .bind(data.code)
        .bind(data.login)
        .bind(data.password)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("{SELECT_USER} WHERE u.id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(user)
    }

    /// Finds a user by login name
    pub async fn find_by_login<'e, E>(executor: E, login: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("{SELECT_USER} WHERE u.login = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(login)
            .fetch_optional(executor)
            .await?;

        Ok(user)
    }

    /// Checks whether a login name is already registered
    pub async fn login_exists<'e, E>(executor: E, login: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)")
                .bind(login)
                .fetch_one(executor)
                .await?;

        Ok(exists)
    }

    /// Checks whether a user ID exists
    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;

        Ok(exists)
    }

    /// Replaces the avatar image
    ///
    /// # Returns
    ///
    /// True if the user existed and was updated
    pub async fn update_avatar<'e, E>(executor: E, id: i64, avatar: &[u8]) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE users SET avatar = $1 WHERE id = $2")
            .bind(avatar)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! User registration, login and profile.

use super::{ServiceError, ServiceResult};
use crate::auth::password::CredentialScheme;
use crate::models::user::CreateUser;
use crate::projection::{project_user, AvatarEncoding, UserResponse};
use crate::store::Store;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid login or password";

pub struct UserService<'a> {
    store: &'a dyn Store,
    scheme: CredentialScheme,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a dyn Store, scheme: CredentialScheme) -> Self {
        Self { store, scheme }
    }

    /// Stores a new user with no avatar and no memberships
    ///
    /// The password goes through the credential scheme first.
    ///
    /// # Errors
    ///
    /// `Storage` if the login is taken
    pub async fn register(&self, mut user: CreateUser) -> ServiceResult<i64> {
        user.password = self.scheme.protect(&user.password)?;
        let login = user.login.clone();
        let id = self.store.insert_user(user).await?;
        info!(user_id = id, %login, "User registered");
        Ok(id)
    }

    pub async fn is_login_taken(&self, login: &str) -> ServiceResult<bool> {
        Ok(self.store.login_exists(login).await?)
    }

    /// Checks credentials and returns the user
    ///
    /// The response echoes the submitted login and password. Its avatar is
    /// [`AvatarEncoding::Base64Text`].
    ///
    /// # Errors
    ///
    /// `Authentication` for an unknown login or a wrong password
    pub async fn login(&self, login: &str, password: &str) -> ServiceResult<UserResponse> {
        let Some(mut user) = self.store.find_user_by_login(login).await? else {
            warn!(%login, "Login attempt for unknown user");
            return Err(ServiceError::Authentication(INVALID_CREDENTIALS.to_string()));
        };

        if !self.scheme.verify(password, &user.password)? {
            warn!(%login, user_id = user.id, "Login attempt with wrong password");
            return Err(ServiceError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        info!(user_id = user.id, "User logged in");
        user.login = login.to_string();
        user.password = password.to_string();
        Ok(project_user(user, AvatarEncoding::Base64Text))
    }

    /// The user's profile with login and password blanked
    ///
    /// # Errors
    ///
    /// `NotFound` if no user has this ID
    pub async fn profile(&self, user_id: i64) -> ServiceResult<UserResponse> {
        let mut user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {user_id} not found")))?;

        user.login.clear();
        user.password.clear();
        Ok(project_user(user, AvatarEncoding::Binary))
    }

    /// Replaces the avatar with the decoded bytes of a standard base64 string
    ///
    /// # Errors
    ///
    /// - `Validation` if `encoded` is not valid base64
    /// - `NotFound` if no user has this ID
    pub async fn update_avatar(&self, user_id: i64, encoded: &str) -> ServiceResult<()> {
        let avatar = STANDARD
            .decode(encoded)
            .map_err(|err| ServiceError::Validation(format!("invalid avatar encoding: {err}")))?;

        let size = avatar.len();
        if !self.store.update_avatar(user_id, avatar).await? {
            return Err(ServiceError::NotFound(format!("user {user_id} not found")));
        }

        info!(user_id, size, "Avatar updated");
        Ok(())
    }
}

//! User business logic service.
//!
//! Handles user creation, credential verification, password changes, and
//! profile updates. Request-level validation happens in the handlers; the
//! rules enforced here are the ones that need database state.

use crate::auth::models::{LoginRequest, RegisterRequest};
use crate::config::Config;
use crate::database::models::{CreateUser, ProfileChanges, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Uniform message for failed logins; never reveals which part was wrong.
const INVALID_CREDENTIALS: &str = "Invalid username/email or password";

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    bcrypt_cost: u32,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Creates a new user from a registration request.
    ///
    /// # Errors
    /// Returns `ServiceError::AlreadyExists` when the email or username is
    /// taken, mapped to 409 by the API layer.
    pub async fn create_user(&self, request: &RegisterRequest) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);

        if repo.email_exists(&request.email).await? {
            return Err(ServiceError::already_exists(
                "User with email",
                &request.email,
            ));
        }

        if repo.username_exists(&request.username).await? {
            return Err(ServiceError::already_exists(
                "User with username",
                &request.username,
            ));
        }

        let password_hash = self.hash_password(&request.password)?;

        let user = repo
            .create_user(CreateUser {
                id: Uuid::now_v7().to_string(),
                username: request.username.clone(),
                email: request.email.clone(),
                password_hash,
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                phone: request.phone.clone(),
                date_of_birth: request.parsed_date_of_birth(),
            })
            .await?;

        Ok(user)
    }

    /// Verifies login credentials and returns the matching user.
    ///
    /// Unknown principal and wrong password yield the same error so the
    /// endpoint cannot be used to probe for accounts.
    pub async fn authenticate_user(&self, login: &LoginRequest) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);

        let user = if let Some(username) = login.username.as_deref().filter(|u| !u.is_empty()) {
            repo.get_user_by_username(username).await?
        } else if let Some(email) = login.email.as_deref().filter(|e| !e.is_empty()) {
            repo.get_user_by_email(email).await?
        } else {
            return Err(ServiceError::validation("Username or email is required"));
        };

        let user = user.ok_or_else(|| ServiceError::unauthorized(INVALID_CREDENTIALS))?;

        if !self.verify_password(&login.password, &user.password_hash)? {
            return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    /// Retrieves a user by ID with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user)
    }

    /// Changes a user's password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let user = self.get_user_required(user_id).await?;

        if !self.verify_password(current_password, &user.password_hash)? {
            return Err(ServiceError::validation("Current password is incorrect"));
        }

        self.set_password(user_id, new_password).await
    }

    /// Replaces a user's password without a current-password check.
    ///
    /// Used by the reset flow, where possession of a valid reset token is
    /// the authorization.
    pub async fn set_password(&self, user_id: &str, new_password: &str) -> ServiceResult<()> {
        let password_hash = self.hash_password(new_password)?;

        let repo = UserRepository::new(self.pool);
        if !repo.update_password(user_id, &password_hash).await? {
            return Err(ServiceError::not_found("User", user_id));
        }

        Ok(())
    }

    /// Applies a partial profile update and returns the fresh row.
    pub async fn update_profile(
        &self,
        user_id: &str,
        changes: ProfileChanges,
    ) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);

        if changes.is_empty() {
            return self.get_user_required(user_id).await;
        }

        let user = repo
            .update_profile(user_id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        Ok(user)
    }

    fn hash_password(&self, password: &str) -> ServiceResult<String> {
        bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> ServiceResult<bool> {
        bcrypt::verify(password, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }
}

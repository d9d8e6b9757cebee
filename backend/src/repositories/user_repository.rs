//! Database repository for user management operations.
//!
//! Provides CRUD operations for system users

use crate::database::models::{CreateUser, ProfileChanges, User};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Repository for user database operations.
///
/// Handles all persistence operations for the User entity. Every lookup
/// filters soft-deleted rows.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `user` - CreateUser DTO containing user details
    ///
    /// # Returns
    /// The newly created User with all fields populated
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (id, username, email, password_hash, first_name, last_name,
                 phone, date_of_birth, role, status, email_verified,
                 created_at, updated_at, is_deleted)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'user', 'active', 0, ?, ?, 0)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.phone)
        .bind(user.date_of_birth)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    ///
    /// # Returns
    /// `Some(User)` if found and not soft-deleted, `None` otherwise
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ? AND is_deleted = 0")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(user)
    }

    /// Retrieves a user by their username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ? AND is_deleted = 0")
                .bind(username)
                .fetch_optional(self.pool)
                .await?;

        Ok(user)
    }

    /// Retrieves a user by their email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? AND is_deleted = 0")
                .bind(email)
                .fetch_optional(self.pool)
                .await?;

        Ok(user)
    }

    /// Checks if a username already exists in the system.
    ///
    /// # Returns
    /// `true` if a user with this username exists (and is not deleted)
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE username = ? AND is_deleted = 0",
        )
        .bind(username)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Checks if an email already exists in the system.
    ///
    /// # Returns
    /// `true` if a user with this email exists (and is not deleted)
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND is_deleted = 0")
                .bind(email)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Records a successful login timestamp.
    pub async fn update_last_login(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ? AND is_deleted = 0")
            .bind(at)
            .bind(at)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Replaces the stored password hash and stamps `password_changed_at`.
    pub async fn update_password(&self, id: &str, password_hash: &str) -> Result<bool> {
        let now = Utc::now();
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, password_changed_at = ?, updated_at = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Marks the user's email address as verified and activates the account.
    pub async fn mark_email_verified(&self, id: &str) -> Result<bool> {
        let now = Utc::now();
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET email_verified = 1, email_verified_at = ?, status = 'active', updated_at = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Applies a partial profile update. Columns with `None` keep their value.
    ///
    /// # Returns
    /// The updated User
    pub async fn update_profile(&self, id: &str, changes: ProfileChanges) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                phone = COALESCE(?, phone),
                date_of_birth = COALESCE(?, date_of_birth),
                bio = COALESCE(?, bio),
                updated_at = ?
            WHERE id = ? AND is_deleted = 0
            RETURNING *
            "#,
        )
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.phone)
        .bind(changes.date_of_birth)
        .bind(changes.bio)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}

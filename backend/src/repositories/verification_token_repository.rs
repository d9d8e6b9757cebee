//! Database repository for email verification tokens.

use crate::database::models::EmailVerificationToken;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for email verification token operations.
pub struct VerificationTokenRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VerificationTokenRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores a freshly generated verification token for a user.
    pub async fn create_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<EmailVerificationToken> {
        let token = sqlx::query_as::<_, EmailVerificationToken>(
            r#"
            INSERT INTO email_verification_tokens (id, user_id, token, expires_at, used, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(token)
    }

    /// Looks a token up by its opaque string value.
    ///
    /// Expiry and single-use checks are the caller's responsibility.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<EmailVerificationToken>> {
        let row = sqlx::query_as::<_, EmailVerificationToken>(
            "SELECT * FROM email_verification_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Marks a token as consumed so it cannot be replayed.
    pub async fn mark_used(&self, id: &str) -> Result<bool> {
        let rows_affected =
            sqlx::query("UPDATE email_verification_tokens SET used = 1 WHERE id = ?")
                .bind(id)
                .execute(self.pool)
                .await?
                .rows_affected();

        Ok(rows_affected > 0)
    }
}

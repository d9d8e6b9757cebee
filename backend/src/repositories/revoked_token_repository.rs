//! Database repository for the JWT denylist.
//!
//! Logout inserts the presented access token here; the auth middleware
//! consults this table before accepting any bearer token.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for revoked token operations.
pub struct RevokedTokenRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RevokedTokenRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Adds a token to the denylist.
    ///
    /// `expires_at` mirrors the token's own expiry; rows past it are inert
    /// because signature validation already rejects the token.
    pub async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> Result<()> {
        // INSERT OR IGNORE: revoking an already revoked token is a no-op.
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO revoked_tokens (id, token, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(token)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Checks whether a token has been revoked.
    pub async fn is_revoked(&self, token: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revoked_tokens WHERE token = ?")
            .bind(token)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }
}

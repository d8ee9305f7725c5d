/*
 * Responsibility
 * - SQLx operations on the users table
 * - UserStore is the seam the identity resolver and the user handlers depend on
 * - "passwordHash" is written on create and never selected here; UserRow
 *   is safe to hand out as-is
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "userName")]
    pub username: String,
    pub location: Option<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<UserRow>>;

    /// Fails with `RepoError::Conflict` when the username is taken.
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        location: Option<&str>,
    ) -> RepoResult<UserRow>;

    async fn get(&self, user_id: Uuid) -> RepoResult<Option<UserRow>>;
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepo {
    async fn list(&self) -> RepoResult<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", "userName", location, "createdAt"
            FROM users
            ORDER BY "createdAt" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        location: Option<&str>,
    ) -> RepoResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users ("userName", "passwordHash", location)
            VALUES ($1, $2, $3)
            RETURNING "userId", "userName", location, "createdAt"
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::from_sqlx(e, "username"))?;

        Ok(row)
    }

    async fn get(&self, user_id: Uuid) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", "userName", location, "createdAt"
            FROM users
            WHERE "userId" = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

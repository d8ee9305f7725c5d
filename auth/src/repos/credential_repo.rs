/*
 * Responsibility
 * - read-only view of the users table for logging in
 * - the resource server owns the schema and writes the rows
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Clone, FromRow)]
pub struct CredentialRow {
    #[sqlx(rename = "userId")]
    pub user_id: Uuid,
    #[sqlx(rename = "passwordHash")]
    pub password_hash: String,
}

impl std::fmt::Debug for CredentialRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRow")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<CredentialRow>>;
}

#[derive(Clone, Debug)]
pub struct PgCredentialRepo {
    pool: PgPool,
}

impl PgCredentialRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialRepo {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<CredentialRow>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT "userId", "passwordHash"
            FROM users
            WHERE "userName" = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

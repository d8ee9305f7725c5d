/*
 * Responsibility
 * - posts CRUD
 * - "authorId" is a FK to users with ON DELETE CASCADE
 * - writes carry the author id in the WHERE clause so a post can only be
 *   changed or removed by the identity that owns it
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    #[sqlx(rename = "postId")]
    pub post_id: i64,

    pub title: String,
    pub content: String,

    #[sqlx(rename = "authorId")]
    pub author_id: Uuid,

    pub location: Option<String>,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A post joined with the author's username (the only author field readers see).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthorRow {
    #[sqlx(flatten)]
    pub post: PostRow,

    #[sqlx(rename = "authorName")]
    pub author_name: String,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(
        &self,
        title: &str,
        content: &str,
        author_id: Uuid,
        location: Option<&str>,
    ) -> RepoResult<PostRow>;

    /// Newest first.
    async fn list_by_location(&self, location: &str) -> RepoResult<Vec<PostWithAuthorRow>>;

    async fn get(&self, post_id: i64) -> RepoResult<Option<PostRow>>;

    async fn get_with_author(&self, post_id: i64) -> RepoResult<Option<PostWithAuthorRow>>;

    /// Replaces title and content. `None` when no post with that id and author exists.
    async fn update(
        &self,
        post_id: i64,
        author_id: Uuid,
        title: &str,
        content: &str,
    ) -> RepoResult<Option<PostRow>>;

    async fn delete(&self, post_id: i64, author_id: Uuid) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgPostRepo {
    pool: PgPool,
}

impl PgPostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostRepo {
    async fn create(
        &self,
        title: &str,
        content: &str,
        author_id: Uuid,
        location: Option<&str>,
    ) -> RepoResult<PostRow> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, "authorId", location)
            VALUES ($1, $2, $3, $4)
            RETURNING
                "postId", title, content, "authorId", location, "createdAt", "updatedAt"
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(author_id)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_by_location(&self, location: &str) -> RepoResult<Vec<PostWithAuthorRow>> {
        let rows = sqlx::query_as::<_, PostWithAuthorRow>(
            r#"
            SELECT
                p."postId", p.title, p.content, p."authorId", p.location,
                p."createdAt", p."updatedAt", u."userName" AS "authorName"
            FROM posts p
            JOIN users u ON u."userId" = p."authorId"
            WHERE p.location = $1
            ORDER BY p."postId" DESC
            "#,
        )
        .bind(location)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                "postId", title, content, "authorId", location, "createdAt", "updatedAt"
            FROM posts
            WHERE "postId" = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_with_author(&self, post_id: i64) -> RepoResult<Option<PostWithAuthorRow>> {
        let row = sqlx::query_as::<_, PostWithAuthorRow>(
            r#"
            SELECT
                p."postId", p.title, p.content, p."authorId", p.location,
                p."createdAt", p."updatedAt", u."userName" AS "authorName"
            FROM posts p
            JOIN users u ON u."userId" = p."authorId"
            WHERE p."postId" = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        post_id: i64,
        author_id: Uuid,
        title: &str,
        content: &str,
    ) -> RepoResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET
                title = $3,
                content = $4,
                "updatedAt" = now()
            WHERE "postId" = $1 AND "authorId" = $2
            RETURNING
                "postId", title, content, "authorId", location, "createdAt", "updatedAt"
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(title)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, post_id: i64, author_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE "postId" = $1 AND "authorId" = $2
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

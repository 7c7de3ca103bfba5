//! Repository for the `posts` table.

use rallypoint_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::{CreatePost, Post, UpdatePost};

/// Select list joining the publishing enterprise's name.
const SELECT: &str = "SELECT p.id, p.enterprise_id, e.name AS enterprise_name, p.title, p.content, \
                      p.image, p.created_at, p.updated_at \
                      FROM posts p JOIN enterprises e ON e.id = p.enterprise_id";

/// Provides CRUD operations for enterprise posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post, returning it with the enterprise name.
    pub async fn create(
        pool: &PgPool,
        enterprise_id: DbId,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            "WITH p AS (
                INSERT INTO posts (enterprise_id, title, content, image)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT p.id, p.enterprise_id, e.name AS enterprise_name, p.title, p.content,
                    p.image, p.created_at, p.updated_at
             FROM p JOIN enterprises e ON e.id = p.enterprise_id",
        )
        .bind(enterprise_id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.image)
        .fetch_one(pool)
        .await
    }

    /// Find a post by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("{SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The public feed: every post, newest first.
    pub async fn list_feed(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY p.created_at DESC, p.id DESC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Post>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// One enterprise's posts, newest first.
    pub async fn list_by_enterprise(
        pool: &PgPool,
        enterprise_id: DbId,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query =
            format!("{SELECT} WHERE p.enterprise_id = $1 ORDER BY p.created_at DESC, p.id DESC");
        sqlx::query_as::<_, Post>(&query)
            .bind(enterprise_id)
            .fetch_all(pool)
            .await
    }

    /// Update a post. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                image = COALESCE($4, image)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.image)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Delete a post. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

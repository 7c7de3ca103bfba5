//! Repository for the `groups` table.

use rallypoint_core::status::GroupRole;
use rallypoint_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::{CreateGroup, Group, GroupWithRole, UpdateGroup};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";

/// Provides CRUD operations for groups.
pub struct GroupRepo;

impl GroupRepo {
    /// Insert a new group and enrol `creator_id` as its leader, in one transaction.
    pub async fn create_with_leader(
        pool: &PgPool,
        creator_id: DbId,
        input: &CreateGroup,
    ) -> Result<Group, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO groups (name, description, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let group = sqlx::query_as::<_, Group>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(creator_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO group_memberships (group_id, user_id, role_in_group) VALUES ($1, $2, $3)",
        )
        .bind(group.id)
        .bind(creator_id)
        .bind(GroupRole::Leader.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(group)
    }

    /// Find a group by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every group, most recently created first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM groups ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List the groups a user belongs to, with the user's role and the member count.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<GroupWithRole>, sqlx::Error> {
        sqlx::query_as::<_, GroupWithRole>(
            "SELECT g.id, g.name, g.description, g.created_by, g.created_at, g.updated_at,
                    m.role_in_group,
                    (SELECT COUNT(*) FROM group_memberships c WHERE c.group_id = g.id) AS member_count
             FROM groups g
             JOIN group_memberships m ON m.group_id = g.id
             WHERE m.user_id = $1
             ORDER BY g.name ASC, g.id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Update a group. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGroup,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "UPDATE groups SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a group with its memberships, availability and events.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `group_memberships` table.

use rallypoint_core::status::GroupRole;
use rallypoint_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::group::{MemberDetail, Membership, MembershipChange};

const COLUMNS: &str = "group_id, user_id, role_in_group, joined_at";

/// Provides operations on group memberships.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Add a user to a group with the given role.
    ///
    /// A second membership for the same pair violates `uq_group_memberships`.
    pub async fn add(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
        role: GroupRole,
    ) -> Result<Membership, sqlx::Error> {
        let query = format!(
            "INSERT INTO group_memberships (group_id, user_id, role_in_group)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Membership>(&query)
            .bind(group_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find the membership linking `user_id` to `group_id`, if any.
    pub async fn find(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Membership>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM group_memberships WHERE group_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Membership>(&query)
            .bind(group_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a group's members with their profiles, leaders first.
    pub async fn list_members(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<MemberDetail>, sqlx::Error> {
        sqlx::query_as::<_, MemberDetail>(
            "SELECT m.user_id, u.username, u.email, m.role_in_group, m.joined_at
             FROM group_memberships m
             JOIN users u ON u.id = m.user_id
             WHERE m.group_id = $1
             ORDER BY (m.role_in_group = 'leader') DESC, u.username ASC",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    /// Ids of every member of a group.
    pub async fn member_ids(pool: &PgPool, group_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM group_memberships WHERE group_id = $1 ORDER BY user_id",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    /// Number of leaders in a group.
    pub async fn count_leaders(pool: &PgPool, group_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM group_memberships WHERE group_id = $1 AND role_in_group = 'leader'",
        )
        .bind(group_id)
        .fetch_one(pool)
        .await
    }

    /// Change a member's role.
    ///
    /// Demoting the group's only leader is refused with
    /// [`MembershipChange::LastLeader`] and changes nothing.
    pub async fn update_role(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
        role: GroupRole,
    ) -> Result<MembershipChange<Membership>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if role == GroupRole::Member && Self::is_sole_leader(&mut tx, group_id, user_id).await? {
            tx.rollback().await?;
            return Ok(MembershipChange::LastLeader);
        }

        let query = format!(
            "UPDATE group_memberships SET role_in_group = $3
             WHERE group_id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Membership>(&query)
            .bind(group_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated.map_or(MembershipChange::NotFound, MembershipChange::Applied))
    }

    /// Remove a member (and, by cascade, their availability in the group).
    ///
    /// Removing the group's only leader is refused with
    /// [`MembershipChange::LastLeader`].
    pub async fn remove(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<MembershipChange<()>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if Self::is_sole_leader(&mut tx, group_id, user_id).await? {
            tx.rollback().await?;
            return Ok(MembershipChange::LastLeader);
        }

        let removed =
            sqlx::query("DELETE FROM group_memberships WHERE group_id = $1 AND user_id = $2")
                .bind(group_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        tx.commit().await?;
        Ok(if removed > 0 {
            MembershipChange::Applied(())
        } else {
            MembershipChange::NotFound
        })
    }

    /// Lock the group's leader rows until `conn`'s transaction ends and report
    /// whether `user_id` is the only leader.
    ///
    /// Concurrent demotions and removals in the same group queue on these row
    /// locks, so each one sees the leaders the previous one left behind.
    async fn is_sole_leader(
        conn: &mut PgConnection,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let leaders = sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM group_memberships
             WHERE group_id = $1 AND role_in_group = 'leader'
             ORDER BY user_id
             FOR UPDATE",
        )
        .bind(group_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(leaders == [user_id])
    }
}

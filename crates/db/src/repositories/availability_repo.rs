//! Repository for the `availability_slots` table.

use rallypoint_core::availability::Slot;
use rallypoint_core::types::DbId;
use sqlx::PgPool;

use crate::models::availability::AvailabilityRow;

/// Stores members' weekly free hours.
pub struct AvailabilityRepo;

impl AvailabilityRepo {
    /// Replace all of a member's slots in a group with `slots`, atomically.
    ///
    /// Returns the number of slots stored.
    pub async fn replace_for_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
        slots: &[Slot],
    ) -> Result<u64, sqlx::Error> {
        let days: Vec<i16> = slots.iter().map(|s| i16::from(s.day())).collect();
        let hours: Vec<i16> = slots.iter().map(|s| i16::from(s.hour())).collect();

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM availability_slots WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let inserted = sqlx::query(
            "INSERT INTO availability_slots (group_id, user_id, day_of_week, hour)
             SELECT $1, $2, d, h FROM UNNEST($3::SMALLINT[], $4::SMALLINT[]) AS t(d, h)
             ON CONFLICT DO NOTHING",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(&days)
        .bind(&hours)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(inserted.rows_affected())
    }

    /// One member's slots in a group, ordered by day then hour.
    pub async fn list_for_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<AvailabilityRow>, sqlx::Error> {
        sqlx::query_as::<_, AvailabilityRow>(
            "SELECT user_id, day_of_week, hour FROM availability_slots
             WHERE group_id = $1 AND user_id = $2
             ORDER BY day_of_week, hour",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Every member's slots in a group.
    pub async fn list_for_group(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<AvailabilityRow>, sqlx::Error> {
        sqlx::query_as::<_, AvailabilityRow>(
            "SELECT user_id, day_of_week, hour FROM availability_slots
             WHERE group_id = $1
             ORDER BY user_id, day_of_week, hour",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }
}

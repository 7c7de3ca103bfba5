//! Repository for the `enterprises` table.

use rallypoint_core::types::DbId;
use sqlx::PgPool;

use crate::models::enterprise::{CreateEnterprise, Enterprise, RankedEnterprise, UpdateEnterprise};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, type, contact, created_at, updated_at";

/// Provides CRUD operations for enterprises.
pub struct EnterpriseRepo;

impl EnterpriseRepo {
    /// Insert the enterprise profile owned by `user_id`.
    ///
    /// A second profile for the same user violates `uq_enterprises_user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateEnterprise,
    ) -> Result<Enterprise, sqlx::Error> {
        let query = format!(
            "INSERT INTO enterprises (user_id, name, type, contact)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enterprise>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.enterprise_type)
            .bind(&input.contact)
            .fetch_one(pool)
            .await
    }

    /// Find an enterprise by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enterprise>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enterprises WHERE id = $1");
        sqlx::query_as::<_, Enterprise>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the enterprise owned by a user.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Enterprise>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enterprises WHERE user_id = $1");
        sqlx::query_as::<_, Enterprise>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List enterprises alphabetically, optionally restricted to one type.
    pub async fn list(
        pool: &PgPool,
        enterprise_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Enterprise>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enterprises
             WHERE ($1::TEXT IS NULL OR type = $1)
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Enterprise>(&query)
            .bind(enterprise_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Enterprises ranked by how many bookings they accepted or completed,
    /// then by name. Used for venue suggestions.
    pub async fn rank_by_popularity(
        pool: &PgPool,
        enterprise_type: Option<&str>,
        limit: i64,
    ) -> Result<Vec<RankedEnterprise>, sqlx::Error> {
        sqlx::query_as::<_, RankedEnterprise>(
            "SELECT e.id, e.name, e.type, e.contact,
                    COUNT(b.id) FILTER (WHERE b.status IN ('accepted', 'completed')) AS booking_count
             FROM enterprises e
             LEFT JOIN bookings b ON b.enterprise_id = e.id
             WHERE ($1::TEXT IS NULL OR e.type = $1)
             GROUP BY e.id
             ORDER BY booking_count DESC, e.name ASC, e.id ASC
             LIMIT $2",
        )
        .bind(enterprise_type)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Update an enterprise. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEnterprise,
    ) -> Result<Option<Enterprise>, sqlx::Error> {
        let query = format!(
            "UPDATE enterprises SET
                name = COALESCE($2, name),
                type = COALESCE($3, type),
                contact = COALESCE($4, contact)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enterprise>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.enterprise_type)
            .bind(&input.contact)
            .fetch_optional(pool)
            .await
    }

    /// Delete an enterprise with its posts and bookings. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enterprises WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Platform-wide counters for the admin overview.

use sqlx::PgPool;

use crate::models::stats::PlatformStats;

pub struct StatsRepo;

impl StatsRepo {
    /// Count rows in every user-facing table in a single round trip.
    pub async fn overview(pool: &PgPool) -> Result<PlatformStats, sqlx::Error> {
        sqlx::query_as::<_, PlatformStats>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM users WHERE status = 'banned') AS banned_users,
                (SELECT COUNT(*) FROM groups) AS groups,
                (SELECT COUNT(*) FROM events) AS events,
                (SELECT COUNT(*) FROM enterprises) AS enterprises,
                (SELECT COUNT(*) FROM bookings) AS bookings,
                (SELECT COUNT(*) FROM bookings WHERE status = 'pending') AS pending_bookings,
                (SELECT COUNT(*) FROM posts) AS posts",
        )
        .fetch_one(pool)
        .await
    }
}

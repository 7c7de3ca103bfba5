use serde::Serialize;
use sqlx::FromRow;

/// Row counts per entity, for the admin overview.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformStats {
    pub users: i64,
    pub banned_users: i64,
    pub groups: i64,
    pub events: i64,
    pub enterprises: i64,
    pub bookings: i64,
    pub pending_bookings: i64,
    pub posts: i64,
}

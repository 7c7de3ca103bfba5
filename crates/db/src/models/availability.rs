//! Availability slot rows.

use rallypoint_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `availability_slots` table (group id omitted; always scoped).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailabilityRow {
    pub user_id: DbId,
    pub day_of_week: i16,
    pub hour: i16,
}

/// One free hour as submitted by or returned to a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlotDto {
    pub day_of_week: i16,
    pub hour: i16,
}

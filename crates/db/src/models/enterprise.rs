//! Enterprise (venue) entity model and DTOs.

use rallypoint_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An enterprise row from the `enterprises` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enterprise {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub enterprise_type: String,
    pub contact: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An enterprise with the number of bookings it has honoured.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RankedEnterprise {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub enterprise_type: String,
    pub contact: Option<String>,
    /// Accepted plus completed bookings.
    pub booking_count: i64,
}

/// DTO for creating a new enterprise. The owner comes from the caller's token.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnterprise {
    pub name: String,
    #[serde(rename = "type")]
    pub enterprise_type: String,
    pub contact: Option<String>,
}

/// DTO for updating an existing enterprise. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEnterprise {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub enterprise_type: Option<String>,
    pub contact: Option<String>,
}

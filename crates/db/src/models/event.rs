//! Event entity model and DTOs.

use rallypoint_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An event row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub group_id: DbId,
    pub name: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub venue: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new event. The owning group comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub venue: Option<String>,
}

/// DTO for updating an existing event. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub venue: Option<String>,
    pub status: Option<String>,
}

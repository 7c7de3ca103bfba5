//! Group and membership models.

use rallypoint_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A group row from the `groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A group as seen by one of its members, carrying that member's role.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupWithRole {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub role_in_group: String,
    pub member_count: i64,
}

/// DTO for creating a new group.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an existing group. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A row from the `group_memberships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Membership {
    pub group_id: DbId,
    pub user_id: DbId,
    pub role_in_group: String,
    pub joined_at: Timestamp,
}

/// A membership joined with the member's public profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberDetail {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub role_in_group: String,
    pub joined_at: Timestamp,
}

/// Outcome of a membership change that must leave the group with a leader.
#[derive(Debug)]
pub enum MembershipChange<T> {
    Applied(T),
    /// No membership links the user to the group.
    NotFound,
    /// The change would take away the group's only leader.
    LastLeader,
}

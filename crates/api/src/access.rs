//! Per-resource authorization checks shared by handlers.
//!
//! Account roles are enforced by the extractors in [`crate::middleware`];
//! the helpers here resolve group roles and ownership, which depend on the
//! row being accessed. Admins pass every check.

use rallypoint_core::status::GroupRole;
use rallypoint_core::types::DbId;
use rallypoint_db::models::enterprise::Enterprise;
use rallypoint_db::models::event::Event;
use rallypoint_db::models::group::{Group, Membership};
use rallypoint_db::repositories::{EnterpriseRepo, EventRepo, GroupRepo, MembershipRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// A group together with the caller's membership in it (if any).
#[derive(Debug)]
pub struct GroupAccess {
    pub group: Group,
    pub membership: Option<Membership>,
}

impl GroupAccess {
    pub fn is_leader(&self) -> bool {
        self.membership
            .as_ref()
            .is_some_and(|m| m.role_in_group == GroupRole::Leader.as_str())
    }
}

/// Verify that a group exists, returning the full row.
pub async fn ensure_group_exists(pool: &PgPool, id: DbId) -> AppResult<Group> {
    GroupRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::not_found("Group", id))
}

/// Verify that an event exists, returning the full row.
pub async fn ensure_event_exists(pool: &PgPool, id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::not_found("Event", id))
}

/// Verify that an enterprise exists, returning the full row.
pub async fn ensure_enterprise_exists(pool: &PgPool, id: DbId) -> AppResult<Enterprise> {
    EnterpriseRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::not_found("Enterprise", id))
}

/// Load a group the caller belongs to (admins may read any group).
pub async fn member_access(
    pool: &PgPool,
    group_id: DbId,
    user: &AuthUser,
) -> AppResult<GroupAccess> {
    let group = ensure_group_exists(pool, group_id).await?;
    let membership = MembershipRepo::find(pool, group_id, user.user_id).await?;
    if membership.is_none() && !user.is_admin() {
        return Err(AppError::forbidden("You are not a member of this group"));
    }
    Ok(GroupAccess { group, membership })
}

/// Load a group the caller leads (admins may manage any group).
pub async fn leader_access(
    pool: &PgPool,
    group_id: DbId,
    user: &AuthUser,
) -> AppResult<GroupAccess> {
    let access = member_access(pool, group_id, user).await?;
    if !access.is_leader() && !user.is_admin() {
        return Err(AppError::forbidden("Group leader role required"));
    }
    Ok(access)
}

/// Load an enterprise the caller owns (admins may manage any enterprise).
pub async fn owned_enterprise(pool: &PgPool, id: DbId, user: &AuthUser) -> AppResult<Enterprise> {
    let enterprise = ensure_enterprise_exists(pool, id).await?;
    if enterprise.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::forbidden("You do not own this enterprise"));
    }
    Ok(enterprise)
}

/// The enterprise profile registered by the caller.
pub async fn caller_enterprise(pool: &PgPool, user: &AuthUser) -> AppResult<Enterprise> {
    EnterpriseRepo::find_by_user_id(pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("You have not created an enterprise profile".into()))
}

//! Handlers for the `/groups` resource and its memberships.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rallypoint_core::error::CoreError;
use rallypoint_core::status::GroupRole;
use rallypoint_core::types::DbId;
use rallypoint_core::validation::require_non_blank;
use rallypoint_db::models::group::{
    CreateGroup, Group, GroupWithRole, MemberDetail, Membership, MembershipChange, UpdateGroup,
};
use rallypoint_db::repositories::{GroupRepo, MembershipRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::access::{leader_access, member_access, GroupAccess};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A group with its member roster, returned by `GET /groups/{id}`.
#[derive(Debug, Serialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: Group,
    /// The caller's role, absent when an admin views a group they are not in.
    pub role_in_group: Option<String>,
    pub members: Vec<MemberDetail>,
}

/// Request body for `POST /groups/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub username: String,
    /// Defaults to `member`.
    pub role_in_group: Option<GroupRole>,
}

/// Request body for `PUT /groups/{id}/members/{user_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub role_in_group: GroupRole,
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// GET /api/groups
///
/// Groups the caller belongs to, with the caller's role and the member count.
pub async fn list_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<GroupWithRole>>>> {
    let groups = GroupRepo::list_for_user(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, count = groups.len(), "Listed groups");
    Ok(Json(DataResponse { data: groups }))
}

/// POST /api/groups
///
/// Create a group; the caller becomes its first leader.
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateGroup>,
) -> AppResult<(StatusCode, Json<Group>)> {
    require_non_blank("name", &input.name)?;

    let group = GroupRepo::create_with_leader(&state.pool, auth.user_id, &input).await?;
    tracing::info!(group_id = group.id, user_id = auth.user_id, "Group created");
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /api/groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<GroupDetail>> {
    let GroupAccess { group, membership } = member_access(&state.pool, id, &auth).await?;
    let members = MembershipRepo::list_members(&state.pool, id).await?;
    Ok(Json(GroupDetail {
        group,
        role_in_group: membership.map(|m| m.role_in_group),
        members,
    }))
}

/// PUT /api/groups/{id}
pub async fn update_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGroup>,
) -> AppResult<Json<Group>> {
    leader_access(&state.pool, id, &auth).await?;
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }

    let group = GroupRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Group", id))?;
    tracing::info!(group_id = id, user_id = auth.user_id, "Group updated");
    Ok(Json(group))
}

/// DELETE /api/groups/{id}
///
/// Removes the group with its memberships, availability, events and bookings.
pub async fn delete_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    leader_access(&state.pool, id, &auth).await?;

    if GroupRepo::delete(&state.pool, id).await? {
        tracing::info!(group_id = id, user_id = auth.user_id, "Group deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Group", id))
    }
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// GET /api/groups/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MemberDetail>>>> {
    member_access(&state.pool, id, &auth).await?;
    let members = MembershipRepo::list_members(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/groups/{id}/members
///
/// A leader adds an existing user by username. Adding someone twice is a 409.
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<(StatusCode, Json<Membership>)> {
    leader_access(&state.pool, id, &auth).await?;

    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user named '{}'", input.username)))?;

    let role = input.role_in_group.unwrap_or(GroupRole::Member);
    let membership = MembershipRepo::add(&state.pool, id, user.id, role).await?;

    tracing::info!(group_id = id, user_id = user.id, role = %role, "Member added");
    Ok((StatusCode::CREATED, Json(membership)))
}

/// PUT /api/groups/{id}/members/{user_id}
///
/// A leader promotes or demotes a member. Demoting the last leader is a 409.
pub async fn update_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateMemberRequest>,
) -> AppResult<Json<Membership>> {
    leader_access(&state.pool, id, &auth).await?;

    let change =
        MembershipRepo::update_role(&state.pool, id, user_id, input.role_in_group).await?;
    let membership = settle(change, user_id)?;

    tracing::info!(
        group_id = id,
        user_id,
        role = %input.role_in_group,
        "Member role changed"
    );
    Ok(Json(membership))
}

/// DELETE /api/groups/{id}/members/{user_id}
///
/// A leader removes a member, or a member leaves by naming themselves.
/// The last leader cannot leave or be removed.
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if user_id == auth.user_id {
        member_access(&state.pool, id, &auth).await?;
    } else {
        leader_access(&state.pool, id, &auth).await?;
    }

    let change = MembershipRepo::remove(&state.pool, id, user_id).await?;
    settle(change, user_id)?;

    tracing::info!(group_id = id, user_id, removed_by = auth.user_id, "Member removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Turn a guarded membership change into the handler's result.
fn settle<T>(change: MembershipChange<T>, user_id: DbId) -> AppResult<T> {
    match change {
        MembershipChange::Applied(value) => Ok(value),
        MembershipChange::NotFound => Err(AppError::not_found("Membership", user_id)),
        MembershipChange::LastLeader => Err(AppError::Core(CoreError::Conflict(
            "A group must keep at least one leader".into(),
        ))),
    }
}

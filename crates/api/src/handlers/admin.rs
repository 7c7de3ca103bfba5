//! Handlers for the `/admin` resource (moderation and platform overview).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rallypoint_core::error::CoreError;
use rallypoint_core::roles::is_valid_role;
use rallypoint_core::status::UserStatus;
use rallypoint_core::types::DbId;
use rallypoint_db::models::group::Group;
use rallypoint_db::models::stats::PlatformStats;
use rallypoint_db::models::user::{UpdateUser, UserResponse};
use rallypoint_db::repositories::{GroupRepo, SessionRepo, StatsRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub role: Option<String>,
    pub status: Option<UserStatus>,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let (limit, offset) = page.resolve();
    let users = UserRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/admin/users/{id}
///
/// Change a user's account role and/or status. Banning revokes every session
/// of the target. Admins cannot demote or ban themselves.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    if let Some(role) = &input.role {
        if !is_valid_role(role) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role: '{role}'"
            ))));
        }
    }
    if id == admin.user_id && (input.role.is_some() || input.status == Some(UserStatus::Banned)) {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot change their own role or ban themselves".into(),
        )));
    }

    let update = UpdateUser {
        role: input.role,
        status: input.status.map(|s| s.as_str().to_string()),
        ..Default::default()
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    if input.status == Some(UserStatus::Banned) {
        let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
        tracing::info!(admin_id = admin.user_id, user_id = id, revoked, "User banned");
    } else {
        tracing::info!(
            admin_id = admin.user_id,
            user_id = id,
            role = %user.role,
            status = %user.status,
            "User updated"
        );
    }

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/admin/users/{id}
///
/// Permanently delete a user. Returns 204 No Content.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot delete their own account".into(),
        )));
    }

    if UserRepo::delete(&state.pool, id).await? {
        tracing::info!(admin_id = admin.user_id, user_id = id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("User", id))
    }
}

/// POST /api/admin/users/{id}/reset-password
///
/// Admin-initiated password reset. Existing sessions of the user are revoked.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, id, &hashed).await? {
        return Err(AppError::not_found("User", id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(admin_id = admin.user_id, user_id = id, "Password reset by admin");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/groups
///
/// Every group on the platform, newest first.
pub async fn list_groups(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Group>>>> {
    let (limit, offset) = page.resolve();
    let groups = GroupRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<PlatformStats>>> {
    let stats = StatsRepo::overview(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

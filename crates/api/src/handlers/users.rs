//! Handlers for the caller's own account (`/users/me`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rallypoint_core::error::CoreError;
use rallypoint_core::validation::validate_username;
use rallypoint_db::models::booking::Booking;
use rallypoint_db::models::group::GroupWithRole;
use rallypoint_db::models::user::{UpdateUser, User, UserResponse};
use rallypoint_db::repositories::{BookingRepo, GroupRepo, SessionRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /users/me`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Request body for `PUT /users/me/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

async fn load_caller(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::not_found("User", auth.user_id))
}

/// GET /api/users/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = load_caller(&state, &auth).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/users/me
///
/// Change the caller's username and/or email. Duplicates yield 409.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;
    if let Some(username) = &input.username {
        validate_username(username)?;
    }

    let update = UpdateUser {
        username: input.username,
        email: input.email.map(|e| e.trim().to_lowercase()),
        ..Default::default()
    };

    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::not_found("User", auth.user_id))?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/users/me/password
///
/// Requires the current password. All sessions are revoked afterwards so
/// other devices must sign in again.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = load_caller(&state, &auth).await?;

    let current_ok = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_ok {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    validate_password_strength(&input.new_password)?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &hashed).await?;
    SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/me/groups
pub async fn my_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<GroupWithRole>>>> {
    let groups = GroupRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// GET /api/users/me/bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let bookings = BookingRepo::list_by_booker(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: bookings }))
}

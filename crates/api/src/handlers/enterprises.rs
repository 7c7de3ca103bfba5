//! Handlers for the `/enterprises` resource (venue profiles and their posts).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rallypoint_core::status::BookingStatus;
use rallypoint_core::types::DbId;
use rallypoint_core::validation::require_non_blank;
use rallypoint_db::models::booking::Booking;
use rallypoint_db::models::enterprise::{CreateEnterprise, Enterprise, UpdateEnterprise};
use rallypoint_db::models::post::{CreatePost, Post};
use rallypoint_db::repositories::{BookingRepo, EnterpriseRepo, PostRepo};
use serde::Deserialize;

use crate::access::{caller_enterprise, ensure_enterprise_exists, owned_enterprise};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEnterprise;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for `GET /enterprises`.
#[derive(Debug, Deserialize)]
pub struct ListEnterprisesParams {
    #[serde(rename = "type")]
    pub enterprise_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /enterprises/me/bookings`.
#[derive(Debug, Deserialize)]
pub struct BookingFilterParams {
    pub status: Option<BookingStatus>,
}

// ---------------------------------------------------------------------------
// Enterprises
// ---------------------------------------------------------------------------

/// GET /api/enterprises
pub async fn list_enterprises(
    State(state): State<AppState>,
    Query(params): Query<ListEnterprisesParams>,
) -> AppResult<Json<DataResponse<Vec<Enterprise>>>> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let enterprise_type = params
        .enterprise_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let items = EnterpriseRepo::list(&state.pool, enterprise_type, limit, offset).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/enterprises/{id}
pub async fn get_enterprise(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Enterprise>> {
    Ok(Json(ensure_enterprise_exists(&state.pool, id).await?))
}

/// POST /api/enterprises
///
/// An enterprise account registers its venue profile. One per account;
/// a second attempt is a 409.
pub async fn create_enterprise(
    State(state): State<AppState>,
    RequireEnterprise(owner): RequireEnterprise,
    Json(input): Json<CreateEnterprise>,
) -> AppResult<(StatusCode, Json<Enterprise>)> {
    require_non_blank("name", &input.name)?;
    require_non_blank("type", &input.enterprise_type)?;

    let enterprise = EnterpriseRepo::create(&state.pool, owner.user_id, &input).await?;
    tracing::info!(
        enterprise_id = enterprise.id,
        user_id = owner.user_id,
        enterprise_type = %enterprise.enterprise_type,
        "Enterprise created"
    );
    Ok((StatusCode::CREATED, Json(enterprise)))
}

/// PUT /api/enterprises/{id}
pub async fn update_enterprise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEnterprise>,
) -> AppResult<Json<Enterprise>> {
    owned_enterprise(&state.pool, id, &auth).await?;
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    if let Some(kind) = &input.enterprise_type {
        require_non_blank("type", kind)?;
    }

    let enterprise = EnterpriseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Enterprise", id))?;
    tracing::info!(enterprise_id = id, user_id = auth.user_id, "Enterprise updated");
    Ok(Json(enterprise))
}

/// DELETE /api/enterprises/{id}
///
/// Removes the profile with its posts and bookings.
pub async fn delete_enterprise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_enterprise(&state.pool, id, &auth).await?;

    if EnterpriseRepo::delete(&state.pool, id).await? {
        tracing::info!(enterprise_id = id, user_id = auth.user_id, "Enterprise deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Enterprise", id))
    }
}

/// GET /api/enterprises/me
pub async fn my_enterprise(
    State(state): State<AppState>,
    RequireEnterprise(owner): RequireEnterprise,
) -> AppResult<Json<Enterprise>> {
    Ok(Json(caller_enterprise(&state.pool, &owner).await?))
}

/// GET /api/enterprises/me/bookings
///
/// Bookings received by the caller's enterprise, optionally `?status=pending`.
pub async fn my_bookings(
    State(state): State<AppState>,
    RequireEnterprise(owner): RequireEnterprise,
    Query(params): Query<BookingFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let enterprise = caller_enterprise(&state.pool, &owner).await?;
    let bookings =
        BookingRepo::list_by_enterprise(&state.pool, enterprise.id, params.status).await?;
    Ok(Json(DataResponse { data: bookings }))
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// GET /api/enterprises/{id}/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Post>>>> {
    ensure_enterprise_exists(&state.pool, id).await?;
    let posts = PostRepo::list_by_enterprise(&state.pool, id).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /api/enterprises/{id}/posts
///
/// Only the owning account may publish.
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let enterprise = ensure_enterprise_exists(&state.pool, id).await?;
    if enterprise.user_id != auth.user_id {
        return Err(AppError::forbidden("Only the owner can publish posts"));
    }
    require_non_blank("title", &input.title)?;
    require_non_blank("content", &input.content)?;

    let post = PostRepo::create(&state.pool, id, &input).await?;
    tracing::info!(post_id = post.id, enterprise_id = id, "Post published");
    Ok((StatusCode::CREATED, Json(post)))
}

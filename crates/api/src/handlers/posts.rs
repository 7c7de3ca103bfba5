//! Handlers for the `/posts` feed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rallypoint_core::types::DbId;
use rallypoint_core::validation::require_non_blank;
use rallypoint_db::models::post::{Post, UpdatePost};
use rallypoint_db::repositories::PostRepo;

use crate::access::ensure_enterprise_exists;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/posts
///
/// Public feed, newest first.
pub async fn feed(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Post>>>> {
    let (limit, offset) = page.resolve();
    let posts = PostRepo::list_feed(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Post>> {
    let post = ensure_post_exists(&state, id).await?;
    Ok(Json(post))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePost>,
) -> AppResult<Json<Post>> {
    let post = ensure_post_exists(&state, id).await?;
    let enterprise = ensure_enterprise_exists(&state.pool, post.enterprise_id).await?;
    if enterprise.user_id != auth.user_id {
        return Err(AppError::forbidden("Only the owner can edit this post"));
    }
    if let Some(title) = &input.title {
        require_non_blank("title", title)?;
    }
    if let Some(content) = &input.content {
        require_non_blank("content", content)?;
    }

    let updated = PostRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Post", id))?;
    tracing::info!(post_id = id, enterprise_id = enterprise.id, "Post updated");
    Ok(Json(updated))
}

/// DELETE /api/posts/{id}
///
/// The owner or an admin may remove a post.
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let post = ensure_post_exists(&state, id).await?;
    if !auth.is_admin() {
        let enterprise = ensure_enterprise_exists(&state.pool, post.enterprise_id).await?;
        if enterprise.user_id != auth.user_id {
            return Err(AppError::forbidden("Only the owner can delete this post"));
        }
    }

    PostRepo::delete(&state.pool, id).await?;
    tracing::info!(post_id = id, user_id = auth.user_id, "Post deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_post_exists(state: &AppState, id: DbId) -> AppResult<Post> {
    PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Post", id))
}

//! Route definitions for the `/posts` feed.

use axum::routing::get;
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /      -> feed (public)
/// GET    /{id}  -> get_post (public)
/// PUT    /{id}  -> update_post (owner)
/// DELETE /{id}  -> delete_post (owner or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(posts::feed)).route(
        "/{id}",
        get(posts::get_post)
            .put(posts::update_post)
            .delete(posts::delete_post),
    )
}

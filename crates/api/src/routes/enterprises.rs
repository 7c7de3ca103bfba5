//! Route definitions for the `/enterprises` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::enterprises;
use crate::state::AppState;

/// Routes mounted at `/enterprises`.
///
/// ```text
/// GET    /               -> list_enterprises (public)
/// POST   /               -> create_enterprise (enterprise role)
/// GET    /me             -> my_enterprise
/// GET    /me/bookings    -> my_bookings
/// GET    /{id}           -> get_enterprise (public)
/// PUT    /{id}           -> update_enterprise
/// DELETE /{id}           -> delete_enterprise
/// GET    /{id}/posts     -> list_posts (public)
/// POST   /{id}/posts     -> create_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(enterprises::list_enterprises).post(enterprises::create_enterprise),
        )
        .route("/me", get(enterprises::my_enterprise))
        .route("/me/bookings", get(enterprises::my_bookings))
        .route(
            "/{id}",
            get(enterprises::get_enterprise)
                .put(enterprises::update_enterprise)
                .delete(enterprises::delete_enterprise),
        )
        .route(
            "/{id}/posts",
            get(enterprises::list_posts).post(enterprises::create_post),
        )
}

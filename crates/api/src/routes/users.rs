//! Route definitions for the caller's own account.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`. All require auth.
///
/// ```text
/// GET  /me           -> get_me
/// PUT  /me           -> update_me
/// PUT  /me/password  -> change_password
/// GET  /me/groups    -> my_groups
/// GET  /me/bookings  -> my_bookings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::get_me).put(users::update_me))
        .route("/me/password", put(users::change_password))
        .route("/me/groups", get(users::my_groups))
        .route("/me/bookings", get(users::my_bookings))
}

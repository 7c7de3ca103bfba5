//! Route definitions for the `/groups` resource.
//!
//! Also nests memberships, availability, suggestions and group events under
//! `/groups/{id}/...`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{availability, events, groups};
use crate::state::AppState;

/// Routes mounted at `/groups`.
///
/// ```text
/// GET    /                              -> list_groups
/// POST   /                              -> create_group
/// GET    /{id}                          -> get_group
/// PUT    /{id}                          -> update_group
/// DELETE /{id}                          -> delete_group
///
/// GET    /{id}/members                  -> list_members
/// POST   /{id}/members                  -> add_member
/// PUT    /{id}/members/{user_id}        -> update_member
/// DELETE /{id}/members/{user_id}        -> remove_member
///
/// GET    /{id}/availability             -> get_grid
/// GET    /{id}/availability/me          -> get_mine
/// PUT    /{id}/availability/me          -> put_mine
/// GET    /{id}/suggestions              -> suggestions
///
/// GET    /{id}/events                   -> list_by_group
/// POST   /{id}/events                   -> create_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(groups::list_groups).post(groups::create_group))
        .route(
            "/{id}",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            "/{id}/members",
            get(groups::list_members).post(groups::add_member),
        )
        .route(
            "/{id}/members/{user_id}",
            put(groups::update_member).delete(groups::remove_member),
        )
        .route("/{id}/availability", get(availability::get_grid))
        .route(
            "/{id}/availability/me",
            get(availability::get_mine).put(availability::put_mine),
        )
        .route("/{id}/suggestions", get(availability::suggestions))
        .route(
            "/{id}/events",
            get(events::list_by_group).post(events::create_event),
        )
}

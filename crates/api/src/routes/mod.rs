pub mod admin;
pub mod auth;
pub mod bookings;
pub mod enterprises;
pub mod events;
pub mod groups;
pub mod health;
pub mod posts;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /users/me                                        get, update own profile
/// /users/me/password                               change password
/// /users/me/groups                                 groups the caller belongs to
/// /users/me/bookings                               bookings the caller placed
///
/// /groups                                          list own, create
/// /groups/{id}                                     get, update, delete
/// /groups/{id}/members                             list, add
/// /groups/{id}/members/{user_id}                   change role, remove / leave
/// /groups/{id}/availability                        aggregated grid (?members=)
/// /groups/{id}/availability/me                     get, replace own slots
/// /groups/{id}/suggestions                         venue suggestions
/// /groups/{id}/events                              list, create
///
/// /events/{id}                                     get, update, delete
/// /events/{id}/bookings                            bookings for an event
///
/// /bookings                                        create
/// /bookings/{id}                                   get
/// /bookings/{id}/accept|reject|complete|cancel     status changes (POST)
///
/// /enterprises                                     list (?type=), create
/// /enterprises/me                                  own profile
/// /enterprises/me/bookings                         received bookings (?status=)
/// /enterprises/{id}                                get, update, delete
/// /enterprises/{id}/posts                          list, publish
///
/// /posts                                           public feed
/// /posts/{id}                                      get, update, delete
///
/// /admin/users                                     list (admin only)
/// /admin/users/{id}                                get, update role/status, delete
/// /admin/users/{id}/reset-password                 reset password
/// /admin/groups                                    every group
/// /admin/stats                                     platform row counts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/groups", groups::router())
        .nest("/events", events::router())
        .nest("/bookings", bookings::router())
        .nest("/enterprises", enterprises::router())
        .nest("/posts", posts::router())
        .nest("/admin", admin::router())
}

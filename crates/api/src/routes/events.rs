//! Route definitions for the `/events` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`. Events are created under `/groups/{id}/events`.
///
/// ```text
/// GET    /{id}           -> get_event
/// PUT    /{id}           -> update_event
/// DELETE /{id}           -> delete_event
/// GET    /{id}/bookings  -> list_bookings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/{id}/bookings", get(events::list_bookings))
}

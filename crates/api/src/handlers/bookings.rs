//! Handlers for the `/bookings` resource.
//!
//! A group leader requests a booking; the enterprise owner accepts, rejects
//! or completes it; the booker or a group leader may cancel it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rallypoint_core::error::CoreError;
use rallypoint_core::status::{validate_booking_transition, BookingStatus, EventStatus};
use rallypoint_core::types::DbId;
use rallypoint_core::validation::validate_party_size;
use rallypoint_db::models::booking::{Booking, CreateBooking};
use rallypoint_db::models::event::Event;
use rallypoint_db::repositories::{BookingRepo, MembershipRepo};

use crate::access::{
    ensure_enterprise_exists, ensure_event_exists, leader_access, member_access, owned_enterprise,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/bookings
///
/// A leader of the event's group books an enterprise. Starts `pending`.
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    validate_party_size(input.number_of_people)?;

    let event = ensure_event_exists(&state.pool, input.event_id).await?;
    leader_access(&state.pool, event.group_id, &auth).await?;
    ensure_event_open(&event)?;
    ensure_enterprise_exists(&state.pool, input.enterprise_id).await?;

    let booking = BookingRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        booking_id = booking.id,
        event_id = booking.event_id,
        enterprise_id = booking.enterprise_id,
        user_id = auth.user_id,
        "Booking requested"
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/bookings/{id}
///
/// Visible to the booker, members of the event's group, the enterprise
/// owner, and admins.
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    let booking = ensure_booking_exists(&state, id).await?;

    if auth.is_admin() || booking.booker_id == Some(auth.user_id) {
        return Ok(Json(booking));
    }
    let enterprise = ensure_enterprise_exists(&state.pool, booking.enterprise_id).await?;
    if enterprise.user_id == auth.user_id {
        return Ok(Json(booking));
    }
    let event = ensure_event_exists(&state.pool, booking.event_id).await?;
    if MembershipRepo::find(&state.pool, event.group_id, auth.user_id)
        .await?
        .is_some()
    {
        return Ok(Json(booking));
    }

    Err(AppError::forbidden("You cannot view this booking"))
}

/// POST /api/bookings/{id}/accept
///
/// The enterprise accepts; the event takes the enterprise as its venue and
/// a planned event becomes confirmed.
pub async fn accept_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    let booking = ensure_booking_exists(&state, id).await?;
    owned_enterprise(&state.pool, booking.enterprise_id, &auth).await?;
    validate_booking_transition(booking.status.parse()?, BookingStatus::Accepted)?;

    let event = ensure_event_exists(&state.pool, booking.event_id).await?;
    ensure_event_open(&event)?;

    let accepted = BookingRepo::accept(&state.pool, id)
        .await?
        .ok_or_else(changed_concurrently)?;
    tracing::info!(
        booking_id = id,
        event_id = accepted.event_id,
        enterprise_id = accepted.enterprise_id,
        "Booking accepted"
    );
    Ok(Json(accepted))
}

/// POST /api/bookings/{id}/reject
pub async fn reject_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    let booking = ensure_booking_exists(&state, id).await?;
    owned_enterprise(&state.pool, booking.enterprise_id, &auth).await?;
    move_booking(&state, &booking, BookingStatus::Rejected).await
}

/// POST /api/bookings/{id}/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    let booking = ensure_booking_exists(&state, id).await?;
    owned_enterprise(&state.pool, booking.enterprise_id, &auth).await?;
    move_booking(&state, &booking, BookingStatus::Completed).await
}

/// POST /api/bookings/{id}/cancel
///
/// The booker or any leader of the event's group may cancel.
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    let booking = ensure_booking_exists(&state, id).await?;

    if booking.booker_id != Some(auth.user_id) {
        let event = ensure_event_exists(&state.pool, booking.event_id).await?;
        let access = member_access(&state.pool, event.group_id, &auth).await?;
        if !access.is_leader() && !auth.is_admin() {
            return Err(AppError::forbidden(
                "Only the booker or a group leader can cancel a booking",
            ));
        }
    }

    move_booking(&state, &booking, BookingStatus::Cancelled).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_booking_exists(state: &AppState, id: DbId) -> AppResult<Booking> {
    BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Booking", id))
}

fn ensure_event_open(event: &Event) -> AppResult<()> {
    let status: EventStatus = event.status.parse()?;
    if !status.accepts_bookings() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Event {} is {status} and no longer takes bookings",
            event.id
        ))));
    }
    Ok(())
}

fn changed_concurrently() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Booking status changed concurrently; reload and retry".into(),
    ))
}

/// Validate and apply a plain status change (everything but acceptance).
async fn move_booking(
    state: &AppState,
    booking: &Booking,
    to: BookingStatus,
) -> AppResult<Json<Booking>> {
    let from: BookingStatus = booking.status.parse()?;
    validate_booking_transition(from, to)?;

    let updated = BookingRepo::transition(&state.pool, booking.id, from, to)
        .await?
        .ok_or_else(changed_concurrently)?;
    tracing::info!(booking_id = booking.id, from = %from, to = %to, "Booking status changed");
    Ok(Json(updated))
}

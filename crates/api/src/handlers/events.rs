//! Handlers for group events (`/groups/{id}/events`, `/events/{id}`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rallypoint_core::status::{validate_event_transition, EventStatus};
use rallypoint_core::types::DbId;
use rallypoint_core::validation::{require_non_blank, validate_time_range};
use rallypoint_db::models::booking::Booking;
use rallypoint_db::models::event::{CreateEvent, Event, UpdateEvent};
use rallypoint_db::repositories::{BookingRepo, EventRepo};

use crate::access::{ensure_event_exists, leader_access, member_access};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/groups/{id}/events
pub async fn list_by_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    member_access(&state.pool, group_id, &auth).await?;
    let events = EventRepo::list_by_group(&state.pool, group_id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/groups/{id}/events
///
/// A leader schedules an event. New events start `planned`.
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<DbId>,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    leader_access(&state.pool, group_id, &auth).await?;
    require_non_blank("name", &input.name)?;
    validate_time_range(input.start_time, input.end_time)?;

    let event = EventRepo::create(&state.pool, group_id, &input).await?;
    tracing::info!(event_id = event.id, group_id, user_id = auth.user_id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Event>> {
    let event = ensure_event_exists(&state.pool, id).await?;
    member_access(&state.pool, event.group_id, &auth).await?;
    Ok(Json(event))
}

/// PUT /api/events/{id}
///
/// Partial update. The resulting time range must stay valid and a status
/// change must follow the event lifecycle.
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<Event>> {
    let event = ensure_event_exists(&state.pool, id).await?;
    leader_access(&state.pool, event.group_id, &auth).await?;

    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    validate_time_range(
        input.start_time.unwrap_or(event.start_time),
        input.end_time.unwrap_or(event.end_time),
    )?;
    if let Some(status) = &input.status {
        let to: EventStatus = status.parse()?;
        let from: EventStatus = event.status.parse()?;
        validate_event_transition(from, to)?;
    }

    let updated = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Event", id))?;
    tracing::info!(
        event_id = id,
        group_id = updated.group_id,
        status = %updated.status,
        "Event updated"
    );
    Ok(Json(updated))
}

/// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let event = ensure_event_exists(&state.pool, id).await?;
    leader_access(&state.pool, event.group_id, &auth).await?;

    if EventRepo::delete(&state.pool, id).await? {
        tracing::info!(event_id = id, group_id = event.group_id, "Event deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Event", id))
    }
}

/// GET /api/events/{id}/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let event = ensure_event_exists(&state.pool, id).await?;
    member_access(&state.pool, event.group_id, &auth).await?;
    let bookings = BookingRepo::list_by_event(&state.pool, id).await?;
    Ok(Json(DataResponse { data: bookings }))
}

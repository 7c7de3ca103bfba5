//! Handlers for group availability: per-member submission, the aggregated
//! grid, and venue suggestions derived from it.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use rallypoint_core::availability::{aggregate, AvailabilityGrid, GridCell, Slot};
use rallypoint_core::error::CoreError;
use rallypoint_core::types::DbId;
use rallypoint_core::validation::clamp_limit;
use rallypoint_db::models::availability::{AvailabilityRow, SlotDto};
use rallypoint_db::models::enterprise::RankedEnterprise;
use rallypoint_db::repositories::{AvailabilityRepo, EnterpriseRepo, MembershipRepo};
use serde::{Deserialize, Serialize};

use crate::access::member_access;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of slots (and venues) returned by the suggestions endpoint.
const DEFAULT_SUGGESTION_LIMIT: i64 = 5;

/// Maximum number of slots (and venues) returned by the suggestions endpoint.
const MAX_SUGGESTION_LIMIT: i64 = 20;

/// Slots below this share of free members are not suggested unless asked.
const DEFAULT_MIN_PERCENTAGE: u8 = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /groups/{id}/availability/me`.
#[derive(Debug, Deserialize)]
pub struct SubmitAvailabilityRequest {
    pub slots: Vec<SlotDto>,
}

/// Query parameters for `GET /groups/{id}/availability`.
#[derive(Debug, Deserialize)]
pub struct GridParams {
    /// Comma-separated member ids, e.g. `?members=3,8`.
    pub members: Option<String>,
}

/// Query parameters for `GET /groups/{id}/suggestions`.
#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    #[serde(rename = "type")]
    pub enterprise_type: Option<String>,
    pub limit: Option<i64>,
    pub min_percentage: Option<u8>,
    pub members: Option<String>,
}

/// Best time slots for the group and venues to hold them at.
#[derive(Debug, Serialize)]
pub struct Suggestions {
    pub member_count: usize,
    pub slots: Vec<GridCell>,
    pub enterprises: Vec<RankedEnterprise>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// PUT /api/groups/{id}/availability/me
///
/// Replace the caller's free hours in this group. Duplicates collapse; any
/// out-of-range slot rejects the whole submission.
pub async fn put_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<DbId>,
    Json(input): Json<SubmitAvailabilityRequest>,
) -> AppResult<Json<DataResponse<Vec<SlotDto>>>> {
    let access = member_access(&state.pool, group_id, &auth).await?;
    if access.membership.is_none() {
        return Err(AppError::forbidden(
            "Only members can submit availability for a group",
        ));
    }

    let slots: BTreeSet<Slot> = input
        .slots
        .iter()
        .map(|s| Slot::from_db(s.day_of_week, s.hour))
        .collect::<Result<_, CoreError>>()?;
    let slots: Vec<Slot> = slots.into_iter().collect();

    let stored =
        AvailabilityRepo::replace_for_member(&state.pool, group_id, auth.user_id, &slots).await?;
    tracing::info!(group_id, user_id = auth.user_id, slots = stored, "Availability replaced");

    let rows = AvailabilityRepo::list_for_member(&state.pool, group_id, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: rows.iter().map(to_dto).collect(),
    }))
}

/// GET /api/groups/{id}/availability/me
pub async fn get_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SlotDto>>>> {
    member_access(&state.pool, group_id, &auth).await?;
    let rows = AvailabilityRepo::list_for_member(&state.pool, group_id, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: rows.iter().map(to_dto).collect(),
    }))
}

/// GET /api/groups/{id}/availability
///
/// The aggregated weekly grid, optionally restricted to `?members=`.
pub async fn get_grid(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<DbId>,
    Query(params): Query<GridParams>,
) -> AppResult<Json<DataResponse<AvailabilityGrid>>> {
    member_access(&state.pool, group_id, &auth).await?;
    let filter = params.members.as_deref().map(parse_member_filter).transpose()?;
    let grid = build_grid(&state, group_id, filter.as_deref()).await?;
    Ok(Json(DataResponse { data: grid }))
}

/// GET /api/groups/{id}/suggestions
///
/// The best-attended hours of the week plus the most-booked venues,
/// optionally of one `?type=`.
pub async fn suggestions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<DbId>,
    Query(params): Query<SuggestionParams>,
) -> AppResult<Json<DataResponse<Suggestions>>> {
    member_access(&state.pool, group_id, &auth).await?;

    let limit = clamp_limit(params.limit, DEFAULT_SUGGESTION_LIMIT, MAX_SUGGESTION_LIMIT);
    let min_percentage = params.min_percentage.unwrap_or(DEFAULT_MIN_PERCENTAGE).min(100);
    let filter = params.members.as_deref().map(parse_member_filter).transpose()?;
    let enterprise_type = params
        .enterprise_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let grid = build_grid(&state, group_id, filter.as_deref()).await?;
    let slots = grid
        .best_slots(limit as usize, min_percentage)
        .into_iter()
        .cloned()
        .collect();
    let enterprises =
        EnterpriseRepo::rank_by_popularity(&state.pool, enterprise_type, limit).await?;

    Ok(Json(DataResponse {
        data: Suggestions {
            member_count: grid.member_count,
            slots,
            enterprises,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn build_grid(
    state: &AppState,
    group_id: DbId,
    filter: Option<&[DbId]>,
) -> AppResult<AvailabilityGrid> {
    let member_ids = MembershipRepo::member_ids(&state.pool, group_id).await?;
    let rows = AvailabilityRepo::list_for_group(&state.pool, group_id).await?;

    let entries = rows
        .iter()
        .map(|r| Slot::from_db(r.day_of_week, r.hour).map(|slot| (r.user_id, slot)))
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(aggregate(&member_ids, entries, filter))
}

/// Parse `"3, 8,11"` into member ids. Empty entries are skipped.
fn parse_member_filter(raw: &str) -> AppResult<Vec<DbId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<DbId>()
                .map_err(|_| AppError::BadRequest(format!("Invalid member id in filter: '{s}'")))
        })
        .collect()
}

fn to_dto(row: &AvailabilityRow) -> SlotDto {
    SlotDto {
        day_of_week: row.day_of_week,
        hour: row.hour,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn member_filter_parses_and_skips_blanks() {
        assert_eq!(parse_member_filter("3, 8,,11").unwrap(), vec![3, 8, 11]);
        assert!(parse_member_filter("").unwrap().is_empty());
    }

    #[test]
    fn member_filter_rejects_garbage() {
        assert_matches!(
            parse_member_filter("3,abc"),
            Err(AppError::BadRequest(msg)) if msg.contains("abc")
        );
    }
}

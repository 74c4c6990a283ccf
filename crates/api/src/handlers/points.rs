//! Handlers for read-side aggregation and ad-hoc ("custom") point grants.
//!
//! Totals are always recomputed from the ledger; nothing here caches a
//! running balance.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use tally_core::error::CoreError;
use tally_core::schedule::validate_span;
use tally_core::types::DbId;
use tally_db::models::custom::{CustomPointsRequest, PointDetail, PointTarget};
use tally_db::repositories::{CustomPointsRepo, PointsRepo};

use crate::auth::identity::RequireAdmin;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /points/members
// ---------------------------------------------------------------------------

/// Member leaderboard: effective point totals, highest first.
pub async fn member_totals(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let totals = PointsRepo::member_totals(&state.pool).await?;
    tracing::debug!(count = totals.len(), "Computed member totals");
    Ok(Json(DataResponse { data: totals }))
}

// ---------------------------------------------------------------------------
// GET /points/departments
// ---------------------------------------------------------------------------

/// Department totals, grouped by category then highest first.
pub async fn department_totals(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let totals = PointsRepo::department_totals(&state.pool).await?;
    tracing::debug!(count = totals.len(), "Computed department totals");
    Ok(Json(DataResponse { data: totals }))
}

// ---------------------------------------------------------------------------
// POST /points/departments/custom, POST /points/members/custom
// ---------------------------------------------------------------------------

/// Reject an inverted span on the fabricated-event path. Attaching to an
/// existing event carries no datetimes.
fn check_event_span(input: &CustomPointsRequest) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (input.start_datetime, input.end_datetime) {
        validate_span(start, end)
            .map_err(CoreError::Validation)
            .map_err(AppError::Core)?;
    }
    Ok(())
}

/// Grant ad-hoc points to departments.
pub async fn create_department_grants(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CustomPointsRequest>,
) -> AppResult<impl IntoResponse> {
    check_event_span(&input)?;
    let report = CustomPointsRepo::create(&state.pool, &input, PointTarget::Department).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// Grant ad-hoc points to members.
pub async fn create_member_grants(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CustomPointsRequest>,
) -> AppResult<impl IntoResponse> {
    check_event_span(&input)?;
    let report = CustomPointsRepo::create(&state.pool, &input, PointTarget::Member).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

// ---------------------------------------------------------------------------
// PUT /points/departments/custom/{log_id}, PUT /points/members/custom/{log_id}
// ---------------------------------------------------------------------------

/// Rewrite a department grant line: action, value, and target set.
pub async fn update_department_grant(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(log_id): Path<DbId>,
    Json(input): Json<PointDetail>,
) -> AppResult<impl IntoResponse> {
    let row =
        CustomPointsRepo::update_point_detail(&state.pool, log_id, &input, PointTarget::Department)
            .await?;
    tracing::info!(log_id, "Department grant updated");
    Ok(Json(DataResponse { data: row }))
}

/// Rewrite a member grant line: action, value, and target set.
pub async fn update_member_grant(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(log_id): Path<DbId>,
    Json(input): Json<PointDetail>,
) -> AppResult<impl IntoResponse> {
    let row = CustomPointsRepo::update_point_detail(&state.pool, log_id, &input, PointTarget::Member)
        .await?;
    tracing::info!(log_id, "Member grant updated");
    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// DELETE /points/custom/{log_id}
// ---------------------------------------------------------------------------

/// Remove a grant line. Idempotent: deleting an absent line succeeds.
pub async fn delete_grant(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(log_id): Path<DbId>,
) -> AppResult<StatusCode> {
    CustomPointsRepo::delete_point_detail(&state.pool, log_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /points/departments/events/{event_id}, GET /points/members/events/{event_id}
// ---------------------------------------------------------------------------

/// List an event's department grant lines.
pub async fn list_department_grants(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listing =
        CustomPointsRepo::list_for_event(&state.pool, event_id, PointTarget::Department).await?;
    Ok(Json(DataResponse { data: listing }))
}

/// List an event's member grant lines.
pub async fn list_member_grants(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listing = CustomPointsRepo::list_for_event(&state.pool, event_id, PointTarget::Member).await?;
    Ok(Json(DataResponse { data: listing }))
}

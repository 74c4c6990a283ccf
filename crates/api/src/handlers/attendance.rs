//! Handlers for day-granular attendance: QR token issuance, member
//! check-in, and attendance listing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use tally_core::error::CoreError;
use tally_core::schedule::DaySelector;
use tally_core::types::DbId;
use tally_db::repositories::{AttendanceRepo, MemberRepo};

use crate::auth::checkin::{generate_checkin_token, verify_checkin_token};
use crate::auth::identity::{AuthMember, RequireAdmin};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /events/{id}/checkin-token
// ---------------------------------------------------------------------------

/// A signed check-in token for embedding in an event QR code.
#[derive(Debug, Serialize)]
pub struct CheckinToken {
    pub token: String,
}

/// Issue a fresh check-in token bound to the event.
pub async fn issue_checkin_token(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let token = generate_checkin_token(event_id, &state.config.checkin)?;
    tracing::debug!(event_id, "Check-in token issued");
    Ok(Json(DataResponse {
        data: CheckinToken { token },
    }))
}

// ---------------------------------------------------------------------------
// POST /events/{id}/checkin
// ---------------------------------------------------------------------------

/// Check-in query: the token scanned from the event QR code.
#[derive(Debug, Deserialize)]
pub struct CheckinParams {
    pub token: String,
}

/// Record the authenticated member's attendance for today.
///
/// The token must verify against this event, the member must pass the
/// event's form gate, and at most one check-in per member per UTC day is
/// accepted.
pub async fn checkin(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(params): Query<CheckinParams>,
) -> AppResult<impl IntoResponse> {
    verify_checkin_token(&params.token, event_id, &state.config.checkin)?;

    let member = MemberRepo::get_by_uni_id(&state.pool, &auth.uni_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No member record matches the authenticated identity".to_string(),
            ))
        })?;

    let record = AttendanceRepo::mark_attendance(
        &state.pool,
        event_id,
        member.id,
        &state.config.attendable_action_ids,
    )
    .await?;

    tracing::info!(event_id, member_id = member.id, "Attendance recorded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

// ---------------------------------------------------------------------------
// GET /events/{id}/attendance
// ---------------------------------------------------------------------------

/// Attendance listing query. `day` is `all`, `exclusive_all`, or a 1-based
/// day number; omitted means `all`.
#[derive(Debug, Deserialize)]
pub struct AttendanceParams {
    pub day: Option<String>,
}

/// List who attended an event, filtered by day selector.
pub async fn event_attendance(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(params): Query<AttendanceParams>,
) -> AppResult<impl IntoResponse> {
    let selector = match params.day.as_deref() {
        None => DaySelector::All,
        Some(raw) => DaySelector::parse(raw).map_err(CoreError::Validation)?,
    };

    let attendance = AttendanceRepo::event_attendance(
        &state.pool,
        event_id,
        selector,
        &state.config.attendable_action_ids,
    )
    .await?;

    Ok(Json(DataResponse { data: attendance }))
}

// ---------------------------------------------------------------------------
// GET /events/{id}/attendance/count
// ---------------------------------------------------------------------------

/// Attendee headcount, safe to expose without auth.
#[derive(Debug, Serialize)]
pub struct AttendanceCount {
    pub event_id: DbId,
    pub event_days: i64,
    pub count: usize,
}

/// Count the attendees matching the day selector. Public: exposes numbers
/// only, never member records.
pub async fn attendance_count(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(params): Query<AttendanceParams>,
) -> AppResult<impl IntoResponse> {
    let selector = match params.day.as_deref() {
        None => DaySelector::All,
        Some(raw) => DaySelector::parse(raw).map_err(CoreError::Validation)?,
    };

    let attendance = AttendanceRepo::event_attendance(
        &state.pool,
        event_id,
        selector,
        &state.config.attendable_action_ids,
    )
    .await?;

    Ok(Json(DataResponse {
        data: AttendanceCount {
            event_id,
            event_days: attendance.event_days,
            count: attendance.attendance.len(),
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /events/{id}/attendance/me
// ---------------------------------------------------------------------------

/// The caller's own attended dates for an event.
#[derive(Debug, Serialize)]
pub struct MyAttendance {
    pub event_id: DbId,
    pub dates: Vec<chrono::NaiveDate>,
}

/// List the dates the authenticated member checked in to this event.
pub async fn my_attendance(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = MemberRepo::get_by_uni_id(&state.pool, &auth.uni_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No member record matches the authenticated identity".to_string(),
            ))
        })?;

    let dates = AttendanceRepo::member_attendance(
        &state.pool,
        event_id,
        member.id,
        &state.config.attendable_action_ids,
    )
    .await?;

    Ok(Json(DataResponse {
        data: MyAttendance { event_id, dates },
    }))
}

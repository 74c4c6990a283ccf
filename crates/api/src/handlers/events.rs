//! Handlers for events and the transactional event-creation workflows.
//!
//! Composite, department-only, and member-only creation each write the event
//! and its full ledger footprint in one transaction; a failure anywhere
//! leaves nothing behind.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use tally_core::error::CoreError;
use tally_core::schedule::validate_span;
use tally_core::types::{DbId, Timestamp};
use tally_db::models::composite::{
    CompositeEventRequest, DepartmentEventRequest, MemberEventRequest,
};
use tally_db::models::event::{CreateEvent, UpdateEvent};
use tally_db::repositories::{CompositeRepo, EventRepo};

use crate::auth::identity::RequireAdmin;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Pagination parameters for event listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Reject inverted event spans before anything is written.
fn check_span(start: Timestamp, end: Timestamp) -> Result<(), AppError> {
    validate_span(start, end)
        .map_err(CoreError::Validation)
        .map_err(AppError::Core)
}

// ---------------------------------------------------------------------------
// GET /events
// ---------------------------------------------------------------------------

/// List events, newest first, paginated.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let per_page = params.per_page.unwrap_or(25).min(100);
    let page = params.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let items = EventRepo::list(&state.pool, per_page, offset).await?;
    tracing::debug!(count = items.len(), page, "Listed events");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /events/open
// ---------------------------------------------------------------------------

/// List open events together with their registration form details.
pub async fn list_open_events(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = EventRepo::list_open(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /events/{id}
// ---------------------------------------------------------------------------

/// Get a single event by id.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::get(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "event", id }))?;
    Ok(Json(DataResponse { data: event }))
}

// ---------------------------------------------------------------------------
// POST /events
// ---------------------------------------------------------------------------

/// Create a bare event with no ledger footprint. Points flow only through
/// the workflow endpoints below.
pub async fn create_event(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<impl IntoResponse> {
    check_span(input.start_datetime, input.end_datetime)?;
    if !EVENT_STATUSES.contains(&input.status.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "unknown event status '{}'",
            input.status
        ))));
    }
    if EventRepo::name_exists(&state.pool, &input.name).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "an event with this name already exists".to_string(),
        )));
    }

    let created = EventRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Event created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// POST /events/composite
// ---------------------------------------------------------------------------

/// Create a composite event: department rows fanned out per day plus one
/// member row per present roster day.
pub async fn create_composite_event(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CompositeEventRequest>,
) -> AppResult<impl IntoResponse> {
    check_span(input.event.start_datetime, input.event.end_datetime)?;
    let report = CompositeRepo::create_composite(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

// ---------------------------------------------------------------------------
// POST /events/department
// ---------------------------------------------------------------------------

/// Create a department-only event.
pub async fn create_department_event(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<DepartmentEventRequest>,
) -> AppResult<impl IntoResponse> {
    check_span(input.event.start_datetime, input.event.end_datetime)?;
    let report = CompositeRepo::create_department_event(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

// ---------------------------------------------------------------------------
// POST /events/member
// ---------------------------------------------------------------------------

/// Create a member-only event.
pub async fn create_member_event(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<MemberEventRequest>,
) -> AppResult<impl IntoResponse> {
    check_span(input.event.start_datetime, input.event.end_datetime)?;
    let report = CompositeRepo::create_member_event(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

// ---------------------------------------------------------------------------
// PUT /events/{id}
// ---------------------------------------------------------------------------

/// Replace an event's descriptive fields. The ledger footprint is untouched.
pub async fn update_event(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<impl IntoResponse> {
    check_span(input.start_datetime, input.end_datetime)?;
    let updated = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "event", id }))?;
    tracing::info!(id = updated.id, "Event updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// PATCH /events/{id}/status
// ---------------------------------------------------------------------------

/// Status transition payload.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

const EVENT_STATUSES: &[&str] = &["draft", "open", "active", "closed"];

/// Move an event to a new lifecycle status.
pub async fn set_event_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<impl IntoResponse> {
    if !EVENT_STATUSES.contains(&input.status.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "unknown event status '{}'",
            input.status
        ))));
    }

    let updated = EventRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "event", id }))?;
    tracing::info!(id = updated.id, status = %updated.status, "Event status changed");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /events/{id}
// ---------------------------------------------------------------------------

/// Delete an event. Logs, forms, and association rows cascade.
pub async fn delete_event(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = EventRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(id, "Event deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "event", id }))
    }
}

//! Handlers for member management and member point history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use tally_core::error::CoreError;
use tally_core::types::DbId;
use tally_db::models::member::CreateMember;
use tally_db::repositories::{MemberRepo, PointsRepo};

use crate::auth::identity::RequireAdmin;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /members
// ---------------------------------------------------------------------------

/// List all members.
pub async fn list_members(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = MemberRepo::list(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed members");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /members
// ---------------------------------------------------------------------------

/// Create a new member.
pub async fn create_member(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMember>,
) -> AppResult<impl IntoResponse> {
    let created = MemberRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, uni_id = %created.uni_id, "Member created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /members/{id}
// ---------------------------------------------------------------------------

/// Get a single member by id.
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = MemberRepo::get(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "member",
            id,
        }))?;
    Ok(Json(DataResponse { data: member }))
}

// ---------------------------------------------------------------------------
// PUT /members/{id}
// ---------------------------------------------------------------------------

/// Replace a member's profile fields.
pub async fn update_member(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateMember>,
) -> AppResult<impl IntoResponse> {
    let updated = MemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "member",
            id,
        }))?;
    tracing::info!(id = updated.id, "Member updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// GET /members/{id}/points
// ---------------------------------------------------------------------------

/// A member's point history, newest entries first, with the running total.
pub async fn member_points(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = PointsRepo::member_points(&state.pool, id).await?;
    Ok(Json(DataResponse { data: history }))
}

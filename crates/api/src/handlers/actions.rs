//! Handlers for the actions catalog.
//!
//! Actions are the fixed scoring vocabulary of the ledger. Catalog rows are
//! referenced by logs and are never deleted, so the write surface is limited
//! to creation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use tally_db::models::action::CreateAction;
use tally_db::repositories::ActionRepo;

use crate::auth::identity::RequireAdmin;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /actions
// ---------------------------------------------------------------------------

/// List the full actions catalog.
pub async fn list_actions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = ActionRepo::list(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed actions");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /actions
// ---------------------------------------------------------------------------

/// Create a new catalog action.
pub async fn create_action(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAction>,
) -> AppResult<impl IntoResponse> {
    let created = ActionRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Action created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /actions/categorized
// ---------------------------------------------------------------------------

/// List actions grouped for the event-creation UI: composite pairs,
/// department-only, member-only, and custom grant actions.
pub async fn categorized_actions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let grouped =
        ActionRepo::list_categorized(&state.pool, &state.config.composite_action_pairs).await?;
    Ok(Json(DataResponse { data: grouped }))
}

// ---------------------------------------------------------------------------
// GET /actions/usage
// ---------------------------------------------------------------------------

/// Per-action log counts, for catalog housekeeping.
pub async fn action_usage(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let usage = ActionRepo::usage_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: usage }))
}

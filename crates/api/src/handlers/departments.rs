//! Handlers for department management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use tally_core::error::CoreError;
use tally_core::types::DbId;
use tally_db::models::department::CreateDepartment;
use tally_db::repositories::DepartmentRepo;

use crate::auth::identity::RequireAdmin;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /departments
// ---------------------------------------------------------------------------

/// List all departments, administrative first.
pub async fn list_departments(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = DepartmentRepo::list(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed departments");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /departments
// ---------------------------------------------------------------------------

/// Create a new department.
pub async fn create_department(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDepartment>,
) -> AppResult<impl IntoResponse> {
    let created = DepartmentRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Department created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /departments/{id}
// ---------------------------------------------------------------------------

/// Get a single department by id.
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let department = DepartmentRepo::get(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "department",
            id,
        }))?;
    Ok(Json(DataResponse { data: department }))
}

// ---------------------------------------------------------------------------
// DELETE /departments/{id}
// ---------------------------------------------------------------------------

/// Delete a department. Its ledger association rows cascade.
pub async fn delete_department(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = DepartmentRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(id, "Department deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "department",
            id,
        }))
    }
}

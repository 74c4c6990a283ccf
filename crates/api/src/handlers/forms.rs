//! Handlers for event forms and member submissions.
//!
//! A form's type decides the attendance gate: `none` means unconditional
//! check-in, `registration` and `external` require an accepted submission.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use tally_core::error::CoreError;
use tally_core::types::DbId;
use tally_db::models::form::{CreateForm, Form, FORM_TYPE_EXTERNAL, FORM_TYPE_NONE, FORM_TYPE_REGISTRATION};
use tally_db::models::submission::CreateSubmission;
use tally_db::repositories::{EventRepo, FormRepo, MemberRepo, SubmissionRepo};

use crate::auth::identity::{AuthMember, RequireAdmin};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that an event exists and return its form, if any.
async fn form_for_event(pool: &sqlx::PgPool, event_id: DbId) -> AppResult<Option<Form>> {
    EventRepo::get(pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "event",
            id: event_id,
        }))?;
    Ok(FormRepo::get_by_event(pool, event_id).await?)
}

// ---------------------------------------------------------------------------
// POST /events/{id}/form
// ---------------------------------------------------------------------------

/// Form creation payload. `event_id` comes from the path.
#[derive(Debug, Deserialize)]
pub struct CreateFormBody {
    pub form_type: String,
    pub external_form_id: Option<String>,
    pub responders_url: Option<String>,
}

/// Attach a form to an event. At most one form per event.
pub async fn create_event_form(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateFormBody>,
) -> AppResult<impl IntoResponse> {
    if ![FORM_TYPE_NONE, FORM_TYPE_REGISTRATION, FORM_TYPE_EXTERNAL]
        .contains(&input.form_type.as_str())
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "unknown form type '{}'",
            input.form_type
        ))));
    }

    if form_for_event(&state.pool, event_id).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "event {event_id} already has a form"
        ))));
    }

    let created = FormRepo::create(
        &state.pool,
        &CreateForm {
            event_id,
            form_type: input.form_type,
            external_form_id: input.external_form_id,
            responders_url: input.responders_url,
        },
    )
    .await?;
    tracing::info!(form_id = created.id, event_id, form_type = %created.form_type, "Form created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /events/{id}/form
// ---------------------------------------------------------------------------

/// Get the form attached to an event.
pub async fn get_event_form(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let form = form_for_event(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "form",
            id: event_id,
        }))?;
    Ok(Json(DataResponse { data: form }))
}

// ---------------------------------------------------------------------------
// DELETE /events/{id}/form
// ---------------------------------------------------------------------------

/// Detach an event's form. Submissions cascade away with it.
pub async fn delete_event_form(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let form = form_for_event(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "form",
            id: event_id,
        }))?;

    FormRepo::delete(&state.pool, form.id).await?;
    tracing::info!(form_id = form.id, event_id, "Form deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /forms/{id}/submissions
// ---------------------------------------------------------------------------

/// List submissions for a form, newest first.
pub async fn list_submissions(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(form_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    FormRepo::get(&state.pool, form_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "form",
            id: form_id,
        }))?;

    let items = SubmissionRepo::list_by_form(&state.pool, form_id).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /forms/{id}/submissions
// ---------------------------------------------------------------------------

/// Submit to a form as the authenticated member. One submission per member
/// per form; a repeat attempt conflicts.
pub async fn create_submission(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(form_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    FormRepo::get(&state.pool, form_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "form",
            id: form_id,
        }))?;

    let member = MemberRepo::get_by_uni_id(&state.pool, &auth.uni_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No member record matches the authenticated identity".to_string(),
            ))
        })?;

    let created = SubmissionRepo::create(
        &state.pool,
        &CreateSubmission {
            form_id,
            member_id: member.id,
            is_accepted: false,
        },
    )
    .await
    .map_err(|err| AppError::Core(tally_db::error::map_db_err(err)))?;

    tracing::info!(submission_id = created.id, form_id, member_id = member.id, "Submission created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PATCH /submissions/{id}/accept
// ---------------------------------------------------------------------------

/// Acceptance payload.
#[derive(Debug, Deserialize)]
pub struct AcceptBody {
    pub is_accepted: bool,
}

/// Flip a submission's acceptance flag. Acceptance is what opens the
/// check-in gate for `registration`/`external` forms.
pub async fn accept_submission(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AcceptBody>,
) -> AppResult<impl IntoResponse> {
    let updated = SubmissionRepo::set_accepted(&state.pool, id, input.is_accepted)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "submission",
            id,
        }))?;
    tracing::info!(id = updated.id, is_accepted = updated.is_accepted, "Submission acceptance set");
    Ok(Json(DataResponse { data: updated }))
}

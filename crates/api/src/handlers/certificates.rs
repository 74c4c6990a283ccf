//! Handler for certificate batch submission.
//!
//! Eligibility is full attendance: a member must hold a check-in for every
//! day of the event span. The upstream call happens after the eligibility
//! read, so a rendering failure never touches ledger state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use tally_core::error::CoreError;
use tally_core::schedule::DaySelector;
use tally_core::types::DbId;
use tally_db::repositories::{AttendanceRepo, EventRepo};

use crate::auth::identity::RequireAdmin;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::services::certificates::{certificate_date_text, CertificateBatch, CertificateRecipient};
use crate::state::AppState;

/// Certificate request payload. `announced_name` overrides the event name
/// printed on the certificate.
#[derive(Debug, Deserialize)]
pub struct CertificateBody {
    pub announced_name: Option<String>,
}

/// Upstream job reference returned to the caller.
#[derive(Debug, Serialize)]
pub struct CertificateJob {
    pub job_id: String,
    pub recipients: usize,
}

// ---------------------------------------------------------------------------
// POST /events/{id}/certificates
// ---------------------------------------------------------------------------

/// Submit certificates for every member with full attendance of the event.
pub async fn request_certificates(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CertificateBody>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::get(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "event",
            id: event_id,
        }))?;

    let attendance = AttendanceRepo::event_attendance(
        &state.pool,
        event_id,
        DaySelector::ExclusiveAll,
        &state.config.attendable_action_ids,
    )
    .await?;

    if attendance.attendance.is_empty() {
        return Err(AppError::BadRequest(
            "No members attended every day of this event".to_string(),
        ));
    }

    let members: Vec<CertificateRecipient> = attendance
        .attendance
        .into_iter()
        .map(|record| CertificateRecipient {
            name: record.member.name,
            email: record.member.email,
            gender: record.member.gender,
        })
        .collect();
    let recipients = members.len();

    let batch = CertificateBatch {
        event_name: event.name.clone(),
        announced_name: input.announced_name.unwrap_or_else(|| event.name.clone()),
        date: certificate_date_text(
            event.start_datetime.date_naive(),
            event.end_datetime.date_naive(),
        ),
        official: event.is_official,
        members,
    };

    let job_id = state.certificates.request_certificates(batch).await?;
    tracing::info!(event_id, recipients, job_id = %job_id, "Certificates requested");

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: CertificateJob { job_id, recipients },
        }),
    ))
}

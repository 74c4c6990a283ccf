//! Translation of low-level sqlx errors into the domain taxonomy.
//!
//! Workflow repositories (composite events, custom points, attendance) run
//! multi-statement transactions and surface [`CoreError`] directly; this
//! module centralizes the constraint-name classification so the same unique
//! violation always maps to the same structured error.

use tally_core::error::CoreError;

/// Unique constraint backing event-name uniqueness.
pub const UQ_EVENTS_NAME: &str = "uq_events_name";
/// Unique constraint backing one-form-per-event.
pub const UQ_FORMS_EVENT: &str = "uq_forms_event";
/// Unique constraint backing member uni_id uniqueness.
pub const UQ_MEMBERS_UNI_ID: &str = "uq_members_uni_id";
/// Unique index backing one member-log row per member/log/day.
pub const UQ_MEMBER_LOG_DAY: &str = "uq_member_log_day";
/// Unique constraint backing one submission per member per form.
pub const UQ_SUBMISSIONS_MEMBER_FORM: &str = "uq_submissions_member_form";

/// Map a sqlx error into the domain taxonomy.
///
/// Unique violations (Postgres 23505) are classified by constraint name:
/// the day-granular member-log index becomes [`CoreError::AlreadyDone`]
/// (two check-ins racing on the same day), every other known constraint
/// becomes [`CoreError::Conflict`]. Everything else is sanitized into
/// [`CoreError::Internal`] after logging the original error.
pub fn map_db_err(err: sqlx::Error) -> CoreError {
    if let Some(constraint) = unique_violation_constraint(&err) {
        return match constraint.as_str() {
            UQ_MEMBER_LOG_DAY => {
                CoreError::AlreadyDone("attendance already marked for today".into())
            }
            UQ_EVENTS_NAME => CoreError::Conflict("an event with this name already exists".into()),
            UQ_FORMS_EVENT => CoreError::Conflict("this event already has a form".into()),
            UQ_MEMBERS_UNI_ID => {
                CoreError::Conflict("a member with this uni_id already exists".into())
            }
            UQ_SUBMISSIONS_MEMBER_FORM => {
                CoreError::AlreadyDone("submission already exists for this form".into())
            }
            other => CoreError::Conflict(format!("duplicate value violates constraint {other}")),
        };
    }

    tracing::error!(error = %err, "Database error");
    CoreError::Internal("database operation failed".into())
}

/// Extract the constraint name from a Postgres unique violation, if this is
/// one.
pub fn unique_violation_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            Some(db_err.constraint().unwrap_or("unknown").to_string())
        }
        _ => None,
    }
}

//! Repository for the `submissions` table.

use sqlx::PgPool;
use tally_core::types::DbId;

use crate::models::submission::{CreateSubmission, Submission};

/// Column list for `submissions` queries.
const SUBMISSION_COLUMNS: &str =
    "id, form_id, member_id, is_accepted, submitted_at, created_at, updated_at";

/// Provides read/write operations for form submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// List the submissions for a form, newest first.
    pub async fn list_by_form(pool: &PgPool, form_id: DbId) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions \
             WHERE form_id = $1 \
             ORDER BY submitted_at DESC"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(form_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a submission. One per member per form
    /// (`uq_submissions_member_form`).
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        create: &CreateSubmission,
    ) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions (form_id, member_id, is_accepted) \
             VALUES ($1, $2, $3) \
             RETURNING {SUBMISSION_COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(create.form_id)
            .bind(create.member_id)
            .bind(create.is_accepted)
            .fetch_one(executor)
            .await
    }

    /// Flip a submission's acceptance flag.
    pub async fn set_accepted(
        pool: &PgPool,
        id: DbId,
        is_accepted: bool,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions SET is_accepted = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {SUBMISSION_COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(is_accepted)
            .fetch_optional(pool)
            .await
    }

    /// True when the member holds an accepted submission for the form. This
    /// is the attendance gate for `registration`/`external` forms.
    pub async fn accepted_exists(
        executor: impl sqlx::PgExecutor<'_>,
        form_id: DbId,
        member_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS ( \
                SELECT 1 FROM submissions \
                WHERE form_id = $1 AND member_id = $2 AND is_accepted \
             )",
        )
        .bind(form_id)
        .bind(member_id)
        .fetch_one(executor)
        .await
    }
}

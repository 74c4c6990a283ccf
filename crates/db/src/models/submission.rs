//! Form submission entity models.
//!
//! Submissions arrive from the external forms provider (synced out of band)
//! or manual admin entry; the attendance gate only reads `is_accepted`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub form_id: DbId,
    pub member_id: DbId,
    pub is_accepted: bool,
    pub submitted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for `submissions`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmission {
    pub form_id: DbId,
    pub member_id: DbId,
    #[serde(default)]
    pub is_accepted: bool,
}

//! Registration form entity models.
//!
//! Each event carries at most one form. The form type gates attendance:
//! `none` admits anyone, `registration`/`external` require an accepted
//! submission.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

pub const FORM_TYPE_NONE: &str = "none";
pub const FORM_TYPE_REGISTRATION: &str = "registration";
pub const FORM_TYPE_EXTERNAL: &str = "external";

/// A row from the `forms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    pub id: DbId,
    pub event_id: DbId,
    pub form_type: String,
    pub external_form_id: Option<String>,
    pub responders_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for `forms`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateForm {
    pub event_id: DbId,
    pub form_type: String,
    pub external_form_id: Option<String>,
    pub responders_url: Option<String>,
}

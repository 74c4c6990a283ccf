//! Department entity models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    pub arabic_name: String,
    /// `"administrative"` or `"practical"`.
    pub category: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for `departments`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
    #[serde(default)]
    pub arabic_name: String,
    pub category: String,
}

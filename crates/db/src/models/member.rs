//! Member entity models.
//!
//! `uni_id` is the natural business key: roster ingestion and identity
//! reconciliation both upsert by it (explicit find-then-branch, never an
//! ORM-style merge).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub uni_id: String,
    pub gender: String,
    pub uni_level: i64,
    pub uni_college: String,
    pub is_authenticated: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert/upsert DTO for `members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMember {
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub uni_id: String,
    pub gender: String,
    #[serde(default)]
    pub uni_level: i64,
    #[serde(default)]
    pub uni_college: String,
}

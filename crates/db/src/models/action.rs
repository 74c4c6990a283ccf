//! Action catalog entity models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// Categories an action can belong to.
///
/// Stored as TEXT with a CHECK constraint; kept as a string in the row
/// struct, with these constants for the writers.
pub const CATEGORY_COMPOSITE: &str = "composite";
pub const CATEGORY_DEPARTMENT: &str = "department";
pub const CATEGORY_MEMBER: &str = "member";
pub const CATEGORY_BONUS: &str = "bonus";

/// A row from the `actions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Action {
    pub id: DbId,
    pub name: String,
    pub arabic_name: String,
    pub category: String,
    pub points: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for `actions`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAction {
    pub name: String,
    #[serde(default)]
    pub arabic_name: String,
    pub category: String,
    pub points: i64,
}

/// Per-action log reference count, for admin tooling.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActionUsage {
    pub action_id: DbId,
    pub log_count: i64,
}

/// Read model grouping the catalog for the points-granting UI: composite
/// pairs (department action + member action granted together), standalone
/// department/member actions, and bonus-category custom actions.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizedActions {
    pub composite_actions: Vec<(Action, Action)>,
    pub department_actions: Vec<Action>,
    pub member_actions: Vec<Action>,
    pub custom_actions: Vec<Action>,
}

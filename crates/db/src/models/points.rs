//! Aggregation read models. Derived from the ledger on every query; nothing
//! here is stored redundantly.

use serde::Serialize;
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// Running point total for one member.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberPoints {
    pub member_id: DbId,
    pub member_name: String,
    pub total_points: i64,
}

/// One event in a member's point history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberHistoryEntry {
    pub event_id: Option<DbId>,
    pub event_name: Option<String>,
    pub start_datetime: Option<Timestamp>,
    pub end_datetime: Option<Timestamp>,
    pub action_name: String,
    pub arabic_action_name: String,
    pub points: i64,
}

/// A member's total plus their per-event history.
#[derive(Debug, Clone, Serialize)]
pub struct MemberPointsHistory {
    pub member_id: DbId,
    pub member_name: String,
    pub total_points: i64,
    pub events: Vec<MemberHistoryEntry>,
}

/// Running point total for one department. Sums association **rows**, so a
/// five-day event contributes five times its per-day value.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DepartmentPoints {
    pub department_id: DbId,
    pub department_name: String,
    pub arabic_department_name: String,
    /// `"administrative"` or `"practical"` leaderboard bucket.
    pub category: String,
    pub total_points: i64,
}

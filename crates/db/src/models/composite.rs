//! Request/report DTOs for the composite-event workflows.

use serde::{Deserialize, Serialize};
use tally_core::types::DbId;

use crate::models::event::{CreateEvent, Event};
use crate::models::member::CreateMember;

/// One ingested roster line: member fields plus one presence flag per event
/// day. Roster parsing (sheets, uploads) happens upstream; by the time a
/// request reaches the orchestrator this is plain data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub member: CreateMember,
    /// `days_present[i]` is true when the member attended day `i` (0-based
    /// offset from the event start date). Absent days create no row.
    pub days_present: Vec<bool>,
}

/// Request for the full composite workflow: one event granting points to a
/// department and a roster of members atomically.
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeEventRequest {
    pub event: CreateEvent,
    pub department_id: DbId,
    pub department_action_id: DbId,
    pub member_action_id: DbId,
    #[serde(default)]
    pub department_bonus: i64,
    #[serde(default)]
    pub department_discount: i64,
    #[serde(default)]
    pub member_bonus: i64,
    #[serde(default)]
    pub member_discount: i64,
    pub roster: Vec<RosterEntry>,
}

/// Request for the department-only variant (no roster, no member log).
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentEventRequest {
    pub event: CreateEvent,
    pub department_id: DbId,
    pub action_id: DbId,
    #[serde(default)]
    pub bonus: i64,
    #[serde(default)]
    pub discount: i64,
}

/// Request for the member-only variant (no department association).
#[derive(Debug, Clone, Deserialize)]
pub struct MemberEventRequest {
    pub event: CreateEvent,
    pub action_id: DbId,
    #[serde(default)]
    pub bonus: i64,
    #[serde(default)]
    pub discount: i64,
    pub roster: Vec<RosterEntry>,
}

/// Creation report returned to the caller after commit.
#[derive(Debug, Clone, Serialize)]
pub struct CompositeEventReport {
    pub event: Event,
    pub days: i64,
    pub department_name: Option<String>,
    /// Projected per-day department accrual times the day count.
    pub department_points: Option<i64>,
    pub members_count: Option<i64>,
    /// Projected full-attendance member accrual.
    pub member_points: Option<i64>,
}

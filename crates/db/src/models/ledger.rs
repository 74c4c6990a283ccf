//! Ledger core entity models: logs, modifications, and the per-entity
//! association rows that actually grant points.

use serde::Serialize;
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// A row from the `logs` table: one occurrence of one action, optionally
/// scoped to an event. Carries no point value itself; its value is the
/// action's points plus the signed modification, if any.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Log {
    pub id: DbId,
    pub event_id: Option<DbId>,
    pub action_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `modifications` table. At most one per log; writers
/// replace in place rather than append.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Modification {
    pub id: DbId,
    pub log_id: DbId,
    /// `"bonus"` (adds `value`) or `"discount"` (subtracts `value`).
    pub kind: String,
    pub value: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `department_logs` table. A department earns the log's
/// value once per row; multi-day accrual is one row per day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DepartmentLog {
    pub id: DbId,
    pub department_id: DbId,
    pub log_id: DbId,
    pub attendants_number: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `member_logs` table. `date` is the attendance/grant date;
/// unique per (member, log, calendar day).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberLog {
    pub id: DbId,
    pub member_id: DbId,
    pub log_id: DbId,
    pub date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

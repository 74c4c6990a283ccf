//! Attendance read/write DTOs.

use chrono::NaiveDate;
use serde::Serialize;
use tally_core::types::DbId;

use crate::models::member::Member;

/// One member's attendance for an event: the distinct calendar dates they
/// checked in, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub member: Member,
    pub dates: Vec<NaiveDate>,
}

/// Attendance listing for an event, with the day count used by the
/// `exclusive_all` filter.
#[derive(Debug, Clone, Serialize)]
pub struct EventAttendance {
    pub event_id: DbId,
    pub event_days: i64,
    pub attendance: Vec<AttendanceRecord>,
}

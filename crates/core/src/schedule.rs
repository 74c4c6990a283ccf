//! Event-day math shared by the workflow orchestrator and attendance queries.
//!
//! Multi-day accrual is row fan-out: one association row per calendar day of
//! the event span, so "how many days" and "which date is day N" must be
//! computed identically everywhere.

use chrono::NaiveDate;

use crate::types::Timestamp;

/// Inclusive day count of an event span. A same-day event is 1 day.
///
/// Negative spans (end before start) clamp to 1 rather than underflow;
/// writers reject them up front with [`validate_span`], the clamp covers
/// reads of rows that predate that check.
pub fn day_count(start: Timestamp, end: Timestamp) -> i64 {
    let days = (end.date_naive() - start.date_naive()).num_days() + 1;
    days.max(1)
}

/// Reject event spans that end before they start. Every event-writing
/// endpoint runs this before touching the database.
pub fn validate_span(start: Timestamp, end: Timestamp) -> Result<(), String> {
    if end < start {
        return Err(format!(
            "end_datetime {end} is before start_datetime {start}"
        ));
    }
    Ok(())
}

/// Calendar date of the 0-based `offset`th day of an event.
pub fn day_date(start: Timestamp, offset: i64) -> NaiveDate {
    start.date_naive() + chrono::Duration::days(offset)
}

/// Day filter for attendance queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelector {
    /// Every attendance row, regardless of date.
    All,
    /// Only members who attended every day of the event span.
    ExclusiveAll,
    /// A specific 1-based day of the event.
    Day(i64),
}

impl DaySelector {
    /// Parse the wire form: `"all"`, `"exclusive_all"`, or a 1-based integer.
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "all" => Ok(DaySelector::All),
            "exclusive_all" => Ok(DaySelector::ExclusiveAll),
            other => match other.parse::<i64>() {
                Ok(n) if n >= 1 => Ok(DaySelector::Day(n)),
                _ => Err(format!(
                    "day must be 'all', 'exclusive_all', or a positive integer, got '{raw}'"
                )),
            },
        }
    }
}

//! Attendance workflows: check-in and per-event attendance queries.
//!
//! The check-in state machine is derived, not stored: a member is
//! "checked in today" exactly when a member-log row for the event's
//! attendable log carries today's UTC date. Two check-ins racing on the
//! same day are serialized by the `uq_member_log_day` index and the loser
//! surfaces the same "already marked" error as a sequential retry.

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tally_core::error::CoreError;
use tally_core::schedule::{day_count, day_date, DaySelector};
use tally_core::types::DbId;

use crate::error::map_db_err;
use crate::models::attendance::{AttendanceRecord, EventAttendance};
use crate::models::form::FORM_TYPE_NONE;
use crate::models::ledger::{Log, MemberLog};
use crate::models::member::Member;
use crate::repositories::{EventRepo, FormRepo, LedgerRepo, MemberRepo, SubmissionRepo};

/// Provides attendance check-in and reporting.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Resolve the event's attendable log: the one whose action belongs to
    /// the configured attendance-bearing whitelist. An event without one is
    /// misconfigured server-side data, never a client error.
    pub async fn attendable_log(
        executor: impl sqlx::PgExecutor<'_>,
        event_id: DbId,
        attendable_action_ids: &[DbId],
    ) -> Result<Log, CoreError> {
        let log = sqlx::query_as::<_, Log>(
            "SELECT id, event_id, action_id, created_at, updated_at \
             FROM logs \
             WHERE event_id = $1 AND action_id = ANY($2) \
             ORDER BY id \
             LIMIT 1",
        )
        .bind(event_id)
        .bind(attendable_action_ids)
        .fetch_optional(executor)
        .await
        .map_err(map_db_err)?;
        log.ok_or_else(|| {
            CoreError::InvariantViolation(format!("event {event_id} has no attendable log"))
        })
    }

    /// Record today's attendance for a member at an event.
    ///
    /// Events with a `registration`/`external` form require a prior accepted
    /// submission; a `none` form (or no form) admits anyone.
    pub async fn mark_attendance(
        pool: &PgPool,
        event_id: DbId,
        member_id: DbId,
        attendable_action_ids: &[DbId],
    ) -> Result<MemberLog, CoreError> {
        let mut tx = pool.begin().await.map_err(map_db_err)?;

        let event = EventRepo::get(&mut *tx, event_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "event",
                id: event_id,
            })?;
        let member = MemberRepo::get(&mut *tx, member_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "member",
                id: member_id,
            })?;

        if let Some(form) = FormRepo::get_by_event(&mut *tx, event_id)
            .await
            .map_err(map_db_err)?
        {
            if form.form_type != FORM_TYPE_NONE {
                let accepted = SubmissionRepo::accepted_exists(&mut *tx, form.id, member_id)
                    .await
                    .map_err(map_db_err)?;
                if !accepted {
                    return Err(CoreError::Forbidden(format!(
                        "member '{}' has no accepted registration for event '{}'",
                        member.uni_id, event.name
                    )));
                }
            }
        }

        let log = Self::attendable_log(&mut *tx, event_id, attendable_action_ids).await?;
        if LedgerRepo::member_log_exists_today(&mut *tx, member_id, log.id)
            .await
            .map_err(map_db_err)?
        {
            return Err(CoreError::AlreadyDone(
                "attendance already marked for today".into(),
            ));
        }

        let row = LedgerRepo::create_member_log(&mut *tx, member_id, log.id, None)
            .await
            .map_err(map_db_err)?;
        tx.commit().await.map_err(map_db_err)?;

        tracing::info!(event_id, member_id, log_id = log.id, "Marked attendance");
        Ok(row)
    }

    /// Per-member attended dates for an event, filtered by `selector`:
    /// everyone, only full-attendance members (the certificate-eligibility
    /// predicate), or a single 1-based event day.
    pub async fn event_attendance(
        pool: &PgPool,
        event_id: DbId,
        selector: DaySelector,
        attendable_action_ids: &[DbId],
    ) -> Result<EventAttendance, CoreError> {
        let event = EventRepo::get(pool, event_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "event",
                id: event_id,
            })?;
        let days = day_count(event.start_datetime, event.end_datetime);
        if let DaySelector::Day(n) = selector {
            if n > days {
                return Err(CoreError::Validation(format!(
                    "day {n} is out of range for a {days}-day event"
                )));
            }
        }

        let log = Self::attendable_log(pool, event_id, attendable_action_ids).await?;
        let rows = sqlx::query_as::<_, AttendanceRow>(
            "SELECT m.id, m.name, m.email, m.phone_number, m.uni_id, m.gender, m.uni_level, \
                    m.uni_college, m.is_authenticated, m.created_at, m.updated_at, \
                    ARRAY_AGG(DISTINCT ((ml.date AT TIME ZONE 'UTC')::date) \
                              ORDER BY ((ml.date AT TIME ZONE 'UTC')::date) DESC) AS dates \
             FROM member_logs ml \
             JOIN members m ON m.id = ml.member_id \
             WHERE ml.log_id = $1 \
             GROUP BY m.id \
             ORDER BY m.name, m.id",
        )
        .bind(log.id)
        .fetch_all(pool)
        .await
        .map_err(map_db_err)?;

        let attendance = rows
            .into_iter()
            .filter_map(|row| {
                let keep = match selector {
                    DaySelector::All => true,
                    DaySelector::ExclusiveAll => row.dates.len() as i64 == days,
                    DaySelector::Day(n) => row
                        .dates
                        .contains(&day_date(event.start_datetime, n - 1)),
                };
                keep.then(|| AttendanceRecord {
                    member: row.member,
                    dates: row.dates,
                })
            })
            .collect();

        Ok(EventAttendance {
            event_id,
            event_days: days,
            attendance,
        })
    }

    /// Distinct dates on which one member checked in to an event, newest
    /// first. Empty when they never attended.
    pub async fn member_attendance(
        pool: &PgPool,
        event_id: DbId,
        member_id: DbId,
        attendable_action_ids: &[DbId],
    ) -> Result<Vec<NaiveDate>, CoreError> {
        EventRepo::get(pool, event_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "event",
                id: event_id,
            })?;
        let log = Self::attendable_log(pool, event_id, attendable_action_ids).await?;
        sqlx::query_scalar(
            "SELECT DISTINCT ((date AT TIME ZONE 'UTC')::date) AS day \
             FROM member_logs \
             WHERE log_id = $1 AND member_id = $2 \
             ORDER BY day DESC",
        )
        .bind(log.id)
        .bind(member_id)
        .fetch_all(pool)
        .await
        .map_err(map_db_err)
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    #[sqlx(flatten)]
    member: Member,
    dates: Vec<NaiveDate>,
}

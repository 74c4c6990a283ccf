//! Composite-event workflow orchestrator.
//!
//! Builds an event plus its department/member logs, per-day department
//! association rows, roster member rows, and modifications as one
//! transaction. Any failure rolls the whole sequence back; readers never see
//! a partial event.

use chrono::NaiveTime;
use sqlx::{PgConnection, PgPool};
use tally_core::error::CoreError;
use tally_core::points::{effective_points, ModificationKind};
use tally_core::schedule::{day_count, day_date};
use tally_core::types::{DbId, Timestamp};

use crate::error::map_db_err;
use crate::models::composite::{
    CompositeEventReport, CompositeEventRequest, DepartmentEventRequest, MemberEventRequest,
    RosterEntry,
};
use crate::repositories::{ActionRepo, DepartmentRepo, EventRepo, LedgerRepo, MemberRepo};

/// Provides the transactional composite/department/member event workflows.
pub struct CompositeRepo;

impl CompositeRepo {
    /// Create a department+member composite event atomically.
    pub async fn create_composite(
        pool: &PgPool,
        req: &CompositeEventRequest,
    ) -> Result<CompositeEventReport, CoreError> {
        let days = day_count(req.event.start_datetime, req.event.end_datetime);
        validate_roster(&req.roster, days)?;
        validate_adjustment(req.department_bonus, req.department_discount)?;
        validate_adjustment(req.member_bonus, req.member_discount)?;

        let mut tx = pool.begin().await.map_err(map_db_err)?;

        check_name_free(&mut tx, &req.event.name).await?;
        let department = DepartmentRepo::get(&mut *tx, req.department_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "department",
                id: req.department_id,
            })?;
        let dept_action = fetch_action(&mut tx, req.department_action_id).await?;
        let member_action = fetch_action(&mut tx, req.member_action_id).await?;

        let event = EventRepo::create(&mut *tx, &req.event)
            .await
            .map_err(map_db_err)?;
        tracing::info!(
            event_id = event.id,
            name = %event.name,
            days,
            roster_len = req.roster.len(),
            "Creating composite event"
        );

        let dept_log = LedgerRepo::create_log(&mut *tx, Some(event.id), dept_action.id)
            .await
            .map_err(map_db_err)?;
        for _ in 0..days {
            LedgerRepo::create_department_log(
                &mut *tx,
                department.id,
                dept_log.id,
                Some(req.roster.len() as i64),
            )
            .await
            .map_err(map_db_err)?;
        }
        let dept_mod = apply_net_modification(
            &mut tx,
            dept_log.id,
            req.department_bonus,
            req.department_discount,
        )
        .await?;

        let member_log = LedgerRepo::create_log(&mut *tx, Some(event.id), member_action.id)
            .await
            .map_err(map_db_err)?;
        let member_mod =
            apply_net_modification(&mut tx, member_log.id, req.member_bonus, req.member_discount)
                .await?;
        enroll_roster(&mut tx, &req.roster, member_log.id, req.event.start_datetime).await?;

        tx.commit().await.map_err(map_db_err)?;

        Ok(CompositeEventReport {
            days,
            department_name: Some(department.name),
            department_points: Some(days * effective_points(dept_action.points, dept_mod)),
            members_count: Some(req.roster.len() as i64),
            member_points: Some(days * effective_points(member_action.points, member_mod)),
            event,
        })
    }

    /// Create a department-only event: no roster, no member log.
    pub async fn create_department_event(
        pool: &PgPool,
        req: &DepartmentEventRequest,
    ) -> Result<CompositeEventReport, CoreError> {
        let days = day_count(req.event.start_datetime, req.event.end_datetime);
        validate_adjustment(req.bonus, req.discount)?;

        let mut tx = pool.begin().await.map_err(map_db_err)?;

        check_name_free(&mut tx, &req.event.name).await?;
        let department = DepartmentRepo::get(&mut *tx, req.department_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "department",
                id: req.department_id,
            })?;
        let action = fetch_action(&mut tx, req.action_id).await?;

        let event = EventRepo::create(&mut *tx, &req.event)
            .await
            .map_err(map_db_err)?;
        tracing::info!(event_id = event.id, name = %event.name, days, "Creating department event");

        let log = LedgerRepo::create_log(&mut *tx, Some(event.id), action.id)
            .await
            .map_err(map_db_err)?;
        for _ in 0..days {
            LedgerRepo::create_department_log(&mut *tx, department.id, log.id, None)
                .await
                .map_err(map_db_err)?;
        }
        let modification = apply_net_modification(&mut tx, log.id, req.bonus, req.discount).await?;

        tx.commit().await.map_err(map_db_err)?;

        Ok(CompositeEventReport {
            days,
            department_name: Some(department.name),
            department_points: Some(days * effective_points(action.points, modification)),
            members_count: None,
            member_points: None,
            event,
        })
    }

    /// Create a member-only event: a roster earns points with no department
    /// association.
    pub async fn create_member_event(
        pool: &PgPool,
        req: &MemberEventRequest,
    ) -> Result<CompositeEventReport, CoreError> {
        let days = day_count(req.event.start_datetime, req.event.end_datetime);
        validate_roster(&req.roster, days)?;
        validate_adjustment(req.bonus, req.discount)?;

        let mut tx = pool.begin().await.map_err(map_db_err)?;

        check_name_free(&mut tx, &req.event.name).await?;
        let action = fetch_action(&mut tx, req.action_id).await?;

        let event = EventRepo::create(&mut *tx, &req.event)
            .await
            .map_err(map_db_err)?;
        tracing::info!(
            event_id = event.id,
            name = %event.name,
            days,
            roster_len = req.roster.len(),
            "Creating member event"
        );

        let log = LedgerRepo::create_log(&mut *tx, Some(event.id), action.id)
            .await
            .map_err(map_db_err)?;
        let modification = apply_net_modification(&mut tx, log.id, req.bonus, req.discount).await?;
        enroll_roster(&mut tx, &req.roster, log.id, req.event.start_datetime).await?;

        tx.commit().await.map_err(map_db_err)?;

        Ok(CompositeEventReport {
            days,
            department_name: None,
            department_points: None,
            members_count: Some(req.roster.len() as i64),
            member_points: Some(days * effective_points(action.points, modification)),
            event,
        })
    }
}

/// Reject a duplicate event name before any row is written. The
/// `uq_events_name` constraint backstops two creations racing past this
/// check.
async fn check_name_free(
    conn: &mut PgConnection,
    name: &str,
) -> Result<(), CoreError> {
    if EventRepo::name_exists(&mut *conn, name)
        .await
        .map_err(map_db_err)?
    {
        return Err(CoreError::Conflict(format!(
            "an event named '{name}' already exists"
        )));
    }
    Ok(())
}

async fn fetch_action(
    conn: &mut PgConnection,
    action_id: DbId,
) -> Result<crate::models::action::Action, CoreError> {
    ActionRepo::get(&mut *conn, action_id)
        .await
        .map_err(map_db_err)?
        .ok_or(CoreError::NotFound {
            entity: "action",
            id: action_id,
        })
}

/// Attach at most one modification carrying the net of `bonus - discount`.
/// Returns the `(kind, value)` pair actually stored, for report math.
async fn apply_net_modification(
    conn: &mut PgConnection,
    log_id: DbId,
    bonus: i64,
    discount: i64,
) -> Result<Option<(ModificationKind, i64)>, CoreError> {
    if bonus == 0 && discount == 0 {
        return Ok(None);
    }
    let net = bonus - discount;
    let kind = ModificationKind::from_sign(net);
    LedgerRepo::replace_modification(conn, log_id, kind, net.abs())
        .await
        .map_err(map_db_err)?;
    Ok(Some((kind, net.abs())))
}

/// Upsert every roster member and insert one member-log row per present day,
/// dated event start plus the day offset. Absent days create no row.
async fn enroll_roster(
    conn: &mut PgConnection,
    roster: &[RosterEntry],
    log_id: DbId,
    event_start: Timestamp,
) -> Result<(), CoreError> {
    for entry in roster {
        let member = MemberRepo::upsert_by_uni_id(&mut *conn, &entry.member)
            .await
            .map_err(map_db_err)?;
        for (offset, present) in entry.days_present.iter().enumerate() {
            if *present {
                let date = day_start(event_start, offset as i64);
                LedgerRepo::create_member_log(&mut *conn, member.id, log_id, Some(date))
                    .await
                    .map_err(map_db_err)?;
            }
        }
    }
    Ok(())
}

/// Midnight UTC of the `offset`th day of the event.
fn day_start(event_start: Timestamp, offset: i64) -> Timestamp {
    day_date(event_start, offset)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

fn validate_roster(roster: &[RosterEntry], days: i64) -> Result<(), CoreError> {
    for entry in roster {
        if entry.days_present.len() as i64 > days {
            return Err(CoreError::Validation(format!(
                "roster row for uni_id '{}' has {} day flags but the event spans {} day(s)",
                entry.member.uni_id,
                entry.days_present.len(),
                days
            )));
        }
    }
    Ok(())
}

fn validate_adjustment(bonus: i64, discount: i64) -> Result<(), CoreError> {
    if bonus < 0 || discount < 0 {
        return Err(CoreError::Validation(
            "bonus and discount must be non-negative".into(),
        ));
    }
    Ok(())
}

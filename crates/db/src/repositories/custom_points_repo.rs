//! Ad-hoc ("custom") point grant workflows: create, edit, delete, and list
//! grants that bypass the composite roster machinery.
//!
//! Each grant line is one log shared by a set of target departments or
//! members. Edits re-resolve the action from scratch and replace the
//! association rows wholesale rather than diffing, which keeps the
//! row-count-based accrual correct by construction.

use sqlx::{FromRow, PgConnection, PgPool};
use tally_core::error::CoreError;
use tally_core::points::{
    effective_points, ModificationKind, BONUS_ACTION_NAME, DISCOUNT_ACTION_NAME,
};
use tally_core::types::DbId;

use crate::error::map_db_err;
use crate::models::action::{Action, CreateAction, CATEGORY_BONUS};
use crate::models::custom::{
    CustomEventPoints, CustomPointsReport, CustomPointsRequest, PointDetail, PointDetailRow,
    PointTarget,
};
use crate::models::event::{CreateEvent, Event};
use crate::repositories::{ActionRepo, DepartmentRepo, EventRepo, LedgerRepo, MemberRepo};

/// Provides the custom point-grant workflows.
pub struct CustomPointsRepo;

impl CustomPointsRepo {
    /// Create one log per point-detail line against an existing or freshly
    /// fabricated event, atomically.
    pub async fn create(
        pool: &PgPool,
        req: &CustomPointsRequest,
        target: PointTarget,
    ) -> Result<CustomPointsReport, CoreError> {
        if req.details.is_empty() {
            return Err(CoreError::Validation(
                "at least one point detail is required".into(),
            ));
        }

        let mut tx = pool.begin().await.map_err(map_db_err)?;

        let event = resolve_event(&mut tx, req).await?;
        tracing::info!(
            event_id = event.id,
            details = req.details.len(),
            ?target,
            "Creating custom point grants"
        );

        let mut log_ids = Vec::with_capacity(req.details.len());
        for detail in &req.details {
            if detail.target_ids.is_empty() {
                return Err(CoreError::Validation(
                    "point detail has no target ids".into(),
                ));
            }
            verify_targets(&mut tx, target, &detail.target_ids).await?;
            let (action, modification) = resolve_action(&mut tx, detail).await?;
            let log = LedgerRepo::create_log(&mut *tx, Some(event.id), action.id)
                .await
                .map_err(map_db_err)?;
            if let Some((kind, value)) = modification {
                LedgerRepo::replace_modification(&mut tx, log.id, kind, value)
                    .await
                    .map_err(map_db_err)?;
            }
            associate(&mut tx, target, log.id, &detail.target_ids).await?;
            log_ids.push(log.id);
        }

        tx.commit().await.map_err(map_db_err)?;
        Ok(CustomPointsReport {
            event_id: event.id,
            log_ids,
        })
    }

    /// Re-resolve a grant line in place: action, modification, and target
    /// set. Associations are deleted and recreated, never diffed.
    pub async fn update_point_detail(
        pool: &PgPool,
        log_id: DbId,
        detail: &PointDetail,
        target: PointTarget,
    ) -> Result<PointDetailRow, CoreError> {
        if detail.target_ids.is_empty() {
            return Err(CoreError::Validation(
                "point detail has no target ids".into(),
            ));
        }

        let mut tx = pool.begin().await.map_err(map_db_err)?;

        LedgerRepo::get_log(&mut *tx, log_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "log",
                id: log_id,
            })?;
        verify_targets(&mut tx, target, &detail.target_ids).await?;

        let (action, modification) = resolve_action(&mut tx, detail).await?;
        LedgerRepo::update_log_action(&mut *tx, log_id, action.id)
            .await
            .map_err(map_db_err)?;
        match modification {
            Some((kind, value)) => {
                LedgerRepo::replace_modification(&mut tx, log_id, kind, value)
                    .await
                    .map_err(map_db_err)?;
            }
            None => {
                LedgerRepo::delete_modifications(&mut *tx, log_id)
                    .await
                    .map_err(map_db_err)?;
            }
        }

        LedgerRepo::delete_department_logs(&mut *tx, log_id)
            .await
            .map_err(map_db_err)?;
        LedgerRepo::delete_member_logs(&mut *tx, log_id)
            .await
            .map_err(map_db_err)?;
        associate(&mut tx, target, log_id, &detail.target_ids).await?;

        tx.commit().await.map_err(map_db_err)?;

        let is_default = modification.is_some();
        Ok(PointDetailRow {
            log_id,
            target_ids: detail.target_ids.clone(),
            points: effective_points(action.points, modification),
            action_id: (!is_default).then_some(action.id),
            action_name: (!is_default).then(|| action.name),
        })
    }

    /// Delete a grant line: the log plus its modification and association
    /// rows (cascade). Deleting an already-deleted line is a no-op.
    pub async fn delete_point_detail(pool: &PgPool, log_id: DbId) -> Result<(), CoreError> {
        let deleted = LedgerRepo::delete_log(pool, log_id)
            .await
            .map_err(map_db_err)?;
        if !deleted {
            tracing::debug!(log_id, "Point detail already deleted");
        }
        Ok(())
    }

    /// List an event's custom grants in the same shape the edit path
    /// accepts.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
        target: PointTarget,
    ) -> Result<CustomEventPoints, CoreError> {
        let event = EventRepo::get(pool, event_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "event",
                id: event_id,
            })?;

        let query = match target {
            PointTarget::Department => {
                "SELECT l.id AS log_id, \
                        a.id AS action_id, a.name AS action_name, a.points AS action_points, \
                        m.kind AS mod_kind, m.value AS mod_value, \
                        ARRAY_AGG(dl.department_id ORDER BY dl.department_id) AS target_ids \
                 FROM logs l \
                 JOIN actions a ON a.id = l.action_id \
                 LEFT JOIN modifications m ON m.log_id = l.id \
                 JOIN department_logs dl ON dl.log_id = l.id \
                 WHERE l.event_id = $1 AND a.category = 'bonus' \
                 GROUP BY l.id, a.id, m.id \
                 ORDER BY l.id"
            }
            PointTarget::Member => {
                "SELECT l.id AS log_id, \
                        a.id AS action_id, a.name AS action_name, a.points AS action_points, \
                        m.kind AS mod_kind, m.value AS mod_value, \
                        ARRAY_AGG(ml.member_id ORDER BY ml.member_id) AS target_ids \
                 FROM logs l \
                 JOIN actions a ON a.id = l.action_id \
                 LEFT JOIN modifications m ON m.log_id = l.id \
                 JOIN member_logs ml ON ml.log_id = l.id \
                 WHERE l.event_id = $1 AND a.category = 'bonus' \
                 GROUP BY l.id, a.id, m.id \
                 ORDER BY l.id"
            }
        };
        let rows = sqlx::query_as::<_, CustomGrantRow>(query)
            .bind(event_id)
            .fetch_all(pool)
            .await
            .map_err(map_db_err)?;

        let mut point_details = Vec::with_capacity(rows.len());
        for row in rows {
            point_details.push(row.into_detail()?);
        }

        Ok(CustomEventPoints {
            event_id: event.id,
            event_name: event.name,
            start_datetime: event.start_datetime,
            end_datetime: event.end_datetime,
            point_details,
        })
    }
}

#[derive(FromRow)]
struct CustomGrantRow {
    log_id: DbId,
    action_id: DbId,
    action_name: String,
    action_points: i64,
    mod_kind: Option<String>,
    mod_value: Option<i64>,
    target_ids: Vec<DbId>,
}

impl CustomGrantRow {
    /// Resolve the row with the same rule the write path uses: reserved
    /// Bonus/Discount containers report the modification alone and hide the
    /// action linkage, named actions report their own identity.
    fn into_detail(self) -> Result<PointDetailRow, CoreError> {
        let modification = match (self.mod_kind.as_deref(), self.mod_value) {
            (Some(kind), Some(value)) => Some((
                kind.parse::<ModificationKind>()
                    .map_err(CoreError::Internal)?,
                value,
            )),
            _ => None,
        };
        let is_default =
            self.action_name == BONUS_ACTION_NAME || self.action_name == DISCOUNT_ACTION_NAME;
        Ok(PointDetailRow {
            log_id: self.log_id,
            target_ids: self.target_ids,
            points: effective_points(self.action_points, modification),
            action_id: (!is_default).then_some(self.action_id),
            action_name: (!is_default).then_some(self.action_name),
        })
    }
}

/// Fetch the request's event, or fabricate a closed location-less one from
/// the inline fields.
async fn resolve_event(
    conn: &mut PgConnection,
    req: &CustomPointsRequest,
) -> Result<Event, CoreError> {
    if let Some(event_id) = req.event_id {
        return EventRepo::get(&mut *conn, event_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "event",
                id: event_id,
            });
    }

    let name = req.event_name.as_deref().ok_or_else(|| {
        CoreError::Validation("event_name is required when event_id is not given".into())
    })?;
    let (start, end) = req.start_datetime.zip(req.end_datetime).ok_or_else(|| {
        CoreError::Validation(
            "start_datetime and end_datetime are required when event_id is not given".into(),
        )
    })?;

    if EventRepo::name_exists(&mut *conn, name)
        .await
        .map_err(map_db_err)?
    {
        return Err(CoreError::Conflict(format!(
            "an event named '{name}' already exists"
        )));
    }
    EventRepo::create(
        &mut *conn,
        &CreateEvent {
            name: name.to_string(),
            location_type: "none".into(),
            location: String::new(),
            start_datetime: start,
            end_datetime: end,
            status: "closed".into(),
            is_official: false,
            description: None,
            image_url: None,
        },
    )
    .await
    .map_err(map_db_err)
}

/// Resolve the action for a grant line, returning the modification to
/// attach. Only the reserved-container fallback carries a modification; a
/// looked-up or freshly named action is authoritative through its own
/// `points`.
async fn resolve_action(
    conn: &mut PgConnection,
    detail: &PointDetail,
) -> Result<(Action, Option<(ModificationKind, i64)>), CoreError> {
    if let Some(action_id) = detail.action_id {
        let action = ActionRepo::get(&mut *conn, action_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "action",
                id: action_id,
            })?;
        return Ok((action, None));
    }

    if let Some(name) = &detail.action_name {
        let action = ActionRepo::create(
            &mut *conn,
            &CreateAction {
                name: name.clone(),
                arabic_name: String::new(),
                category: CATEGORY_BONUS.into(),
                points: detail.points,
            },
        )
        .await
        .map_err(map_db_err)?;
        return Ok((action, None));
    }

    let kind = ModificationKind::from_sign(detail.points);
    let action = ActionRepo::get_or_create_reserved(&mut *conn, kind)
        .await
        .map_err(map_db_err)?;
    Ok((action, Some((kind, detail.points.abs()))))
}

fn target_entity(target: PointTarget) -> &'static str {
    match target {
        PointTarget::Department => "department",
        PointTarget::Member => "member",
    }
}

async fn verify_targets(
    conn: &mut PgConnection,
    target: PointTarget,
    ids: &[DbId],
) -> Result<(), CoreError> {
    for &id in ids {
        let exists = match target {
            PointTarget::Department => DepartmentRepo::get(&mut *conn, id)
                .await
                .map_err(map_db_err)?
                .is_some(),
            PointTarget::Member => MemberRepo::get(&mut *conn, id)
                .await
                .map_err(map_db_err)?
                .is_some(),
        };
        if !exists {
            return Err(CoreError::NotFound {
                entity: target_entity(target),
                id,
            });
        }
    }
    Ok(())
}

/// Insert one association row per target id.
async fn associate(
    conn: &mut PgConnection,
    target: PointTarget,
    log_id: DbId,
    ids: &[DbId],
) -> Result<(), CoreError> {
    for &id in ids {
        match target {
            PointTarget::Department => {
                LedgerRepo::create_department_log(&mut *conn, id, log_id, None)
                    .await
                    .map_err(map_db_err)?;
            }
            PointTarget::Member => {
                LedgerRepo::create_member_log(&mut *conn, id, log_id, None)
                    .await
                    .map_err(map_db_err)?;
            }
        }
    }
    Ok(())
}

//! Read-side aggregation over the ledger. Totals are recomputed per query
//! from the association rows; nothing is cached or stored redundantly.

use sqlx::PgPool;
use tally_core::error::CoreError;
use tally_core::types::DbId;

use crate::error::map_db_err;
use crate::models::points::{
    DepartmentPoints, MemberHistoryEntry, MemberPoints, MemberPointsHistory,
};
use crate::repositories::MemberRepo;

/// Signed delta contributed by a log's modification, zero when absent.
const SIGNED_MODIFICATION: &str = "COALESCE(CASE WHEN mo.kind = 'bonus' THEN mo.value \
                                                 WHEN mo.kind = 'discount' THEN -mo.value END, 0)";

/// Provides the leaderboard and history aggregation queries.
pub struct PointsRepo;

impl PointsRepo {
    /// Running totals for every member, highest first. A member-log row
    /// contributes its action's points plus the signed modification;
    /// department-category actions never reach member rows and are excluded
    /// defensively by the category filter.
    pub async fn member_totals(pool: &PgPool) -> Result<Vec<MemberPoints>, CoreError> {
        let query = format!(
            "SELECT m.id AS member_id, m.name AS member_name, \
                    COALESCE(SUM(a.points + {SIGNED_MODIFICATION}), 0)::BIGINT AS total_points \
             FROM members m \
             LEFT JOIN member_logs ml ON ml.member_id = m.id \
             LEFT JOIN logs l ON l.id = ml.log_id \
             LEFT JOIN actions a ON a.id = l.action_id \
                  AND a.category IN ('member', 'composite', 'bonus') \
             LEFT JOIN modifications mo ON mo.log_id = l.id \
             GROUP BY m.id \
             ORDER BY total_points DESC, m.name, m.id"
        );
        sqlx::query_as::<_, MemberPoints>(&query)
            .fetch_all(pool)
            .await
            .map_err(map_db_err)
    }

    /// One member's total plus their per-event history, newest first.
    pub async fn member_points(
        pool: &PgPool,
        member_id: DbId,
    ) -> Result<MemberPointsHistory, CoreError> {
        let member = MemberRepo::get(pool, member_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound {
                entity: "member",
                id: member_id,
            })?;

        let query = format!(
            "SELECT e.id AS event_id, e.name AS event_name, e.start_datetime, e.end_datetime, \
                    a.name AS action_name, a.arabic_name AS arabic_action_name, \
                    (a.points + {SIGNED_MODIFICATION})::BIGINT AS points \
             FROM member_logs ml \
             JOIN logs l ON l.id = ml.log_id \
             JOIN actions a ON a.id = l.action_id \
                  AND a.category IN ('member', 'composite', 'bonus') \
             LEFT JOIN events e ON e.id = l.event_id \
             LEFT JOIN modifications mo ON mo.log_id = l.id \
             WHERE ml.member_id = $1 \
             ORDER BY ml.date DESC, ml.id DESC"
        );
        let events: Vec<MemberHistoryEntry> = sqlx::query_as(&query)
            .bind(member_id)
            .fetch_all(pool)
            .await
            .map_err(map_db_err)?;

        let total_points = events.iter().map(|entry| entry.points).sum();
        Ok(MemberPointsHistory {
            member_id: member.id,
            member_name: member.name,
            total_points,
            events,
        })
    }

    /// Running totals for every department, bucketed by category. Sums
    /// association **rows**: a five-day event contributes five times its
    /// per-day value because the orchestrator wrote five rows.
    pub async fn department_totals(pool: &PgPool) -> Result<Vec<DepartmentPoints>, CoreError> {
        let query = format!(
            "SELECT d.id AS department_id, d.name AS department_name, \
                    d.arabic_name AS arabic_department_name, d.category, \
                    COALESCE(SUM(a.points + {SIGNED_MODIFICATION}), 0)::BIGINT AS total_points \
             FROM departments d \
             LEFT JOIN department_logs dl ON dl.department_id = d.id \
             LEFT JOIN logs l ON l.id = dl.log_id \
             LEFT JOIN actions a ON a.id = l.action_id \
             LEFT JOIN modifications mo ON mo.log_id = l.id \
             GROUP BY d.id \
             ORDER BY d.category, total_points DESC, d.name"
        );
        sqlx::query_as::<_, DepartmentPoints>(&query)
            .fetch_all(pool)
            .await
            .map_err(map_db_err)
    }
}

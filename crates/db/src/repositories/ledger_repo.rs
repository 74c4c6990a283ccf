//! Primitive writes and reads for the ledger core tables: `logs`,
//! `modifications`, `department_logs`, `member_logs`.
//!
//! Every method takes an executor so the workflow repositories can run them
//! inside their own transactions. Nothing here begins or commits.

use sqlx::PgConnection;
use tally_core::points::ModificationKind;
use tally_core::types::{DbId, Timestamp};

use crate::models::ledger::{DepartmentLog, Log, MemberLog, Modification};

/// Column list for `logs` queries.
const LOG_COLUMNS: &str = "id, event_id, action_id, created_at, updated_at";

/// Column list for `modifications` queries.
const MODIFICATION_COLUMNS: &str = "id, log_id, kind, value, created_at, updated_at";

/// Column list for `department_logs` queries.
const DEPARTMENT_LOG_COLUMNS: &str =
    "id, department_id, log_id, attendants_number, created_at, updated_at";

/// Column list for `member_logs` queries.
const MEMBER_LOG_COLUMNS: &str = "id, member_id, log_id, date, created_at, updated_at";

/// Provides primitive operations on the append-only ledger.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Insert a log: one occurrence of an action, optionally tied to an
    /// event.
    pub async fn create_log(
        executor: impl sqlx::PgExecutor<'_>,
        event_id: Option<DbId>,
        action_id: DbId,
    ) -> Result<Log, sqlx::Error> {
        let query = format!(
            "INSERT INTO logs (event_id, action_id) VALUES ($1, $2) RETURNING {LOG_COLUMNS}"
        );
        sqlx::query_as::<_, Log>(&query)
            .bind(event_id)
            .bind(action_id)
            .fetch_one(executor)
            .await
    }

    /// Find a log by id.
    pub async fn get_log(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Log>, sqlx::Error> {
        let query = format!("SELECT {LOG_COLUMNS} FROM logs WHERE id = $1");
        sqlx::query_as::<_, Log>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List an event's logs ordered by id.
    pub async fn logs_by_event(
        executor: impl sqlx::PgExecutor<'_>,
        event_id: DbId,
    ) -> Result<Vec<Log>, sqlx::Error> {
        let query = format!("SELECT {LOG_COLUMNS} FROM logs WHERE event_id = $1 ORDER BY id");
        sqlx::query_as::<_, Log>(&query)
            .bind(event_id)
            .fetch_all(executor)
            .await
    }

    /// Repoint a log at a different action.
    pub async fn update_log_action(
        executor: impl sqlx::PgExecutor<'_>,
        log_id: DbId,
        action_id: DbId,
    ) -> Result<Option<Log>, sqlx::Error> {
        let query = format!(
            "UPDATE logs SET action_id = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {LOG_COLUMNS}"
        );
        sqlx::query_as::<_, Log>(&query)
            .bind(log_id)
            .bind(action_id)
            .fetch_optional(executor)
            .await
    }

    /// Delete a log. Its modification and association rows cascade.
    /// Returns `false` if no row existed.
    pub async fn delete_log(
        executor: impl sqlx::PgExecutor<'_>,
        log_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM logs WHERE id = $1")
            .bind(log_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch a log's modification, if any. At most one exists in normal use.
    pub async fn modification_for_log(
        executor: impl sqlx::PgExecutor<'_>,
        log_id: DbId,
    ) -> Result<Option<Modification>, sqlx::Error> {
        let query = format!(
            "SELECT {MODIFICATION_COLUMNS} FROM modifications \
             WHERE log_id = $1 \
             ORDER BY id DESC LIMIT 1"
        );
        sqlx::query_as::<_, Modification>(&query)
            .bind(log_id)
            .fetch_optional(executor)
            .await
    }

    /// Replace a log's modification in place: delete any existing rows,
    /// insert the new one. `value` must be non-negative; the sign lives in
    /// `kind`.
    pub async fn replace_modification(
        conn: &mut PgConnection,
        log_id: DbId,
        kind: ModificationKind,
        value: i64,
    ) -> Result<Modification, sqlx::Error> {
        sqlx::query("DELETE FROM modifications WHERE log_id = $1")
            .bind(log_id)
            .execute(&mut *conn)
            .await?;
        let query = format!(
            "INSERT INTO modifications (log_id, kind, value) \
             VALUES ($1, $2, $3) \
             RETURNING {MODIFICATION_COLUMNS}"
        );
        sqlx::query_as::<_, Modification>(&query)
            .bind(log_id)
            .bind(kind.as_str())
            .bind(value)
            .fetch_one(&mut *conn)
            .await
    }

    /// Delete a log's modification rows.
    pub async fn delete_modifications(
        executor: impl sqlx::PgExecutor<'_>,
        log_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM modifications WHERE log_id = $1")
            .bind(log_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Insert one department association row. A department earns the log's
    /// value once per row; multi-day accrual calls this once per day.
    pub async fn create_department_log(
        executor: impl sqlx::PgExecutor<'_>,
        department_id: DbId,
        log_id: DbId,
        attendants_number: Option<i64>,
    ) -> Result<DepartmentLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO department_logs (department_id, log_id, attendants_number) \
             VALUES ($1, $2, $3) \
             RETURNING {DEPARTMENT_LOG_COLUMNS}"
        );
        sqlx::query_as::<_, DepartmentLog>(&query)
            .bind(department_id)
            .bind(log_id)
            .bind(attendants_number)
            .fetch_one(executor)
            .await
    }

    /// Insert one member association row. `date` defaults to now; the
    /// roster path passes explicit per-day dates. Violating the per-day
    /// uniqueness raises the `uq_member_log_day` constraint.
    pub async fn create_member_log(
        executor: impl sqlx::PgExecutor<'_>,
        member_id: DbId,
        log_id: DbId,
        date: Option<Timestamp>,
    ) -> Result<MemberLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO member_logs (member_id, log_id, date) \
             VALUES ($1, $2, COALESCE($3, now())) \
             RETURNING {MEMBER_LOG_COLUMNS}"
        );
        sqlx::query_as::<_, MemberLog>(&query)
            .bind(member_id)
            .bind(log_id)
            .bind(date)
            .fetch_one(executor)
            .await
    }

    /// Delete a log's department association rows.
    pub async fn delete_department_logs(
        executor: impl sqlx::PgExecutor<'_>,
        log_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM department_logs WHERE log_id = $1")
            .bind(log_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a log's member association rows.
    pub async fn delete_member_logs(
        executor: impl sqlx::PgExecutor<'_>,
        log_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM member_logs WHERE log_id = $1")
            .bind(log_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Count a log's department association rows.
    pub async fn department_log_count(
        executor: impl sqlx::PgExecutor<'_>,
        log_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM department_logs WHERE log_id = $1")
            .bind(log_id)
            .fetch_one(executor)
            .await
    }

    /// True when the member already holds a row for this log dated today
    /// (UTC calendar day).
    pub async fn member_log_exists_today(
        executor: impl sqlx::PgExecutor<'_>,
        member_id: DbId,
        log_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS ( \
                SELECT 1 FROM member_logs \
                WHERE member_id = $1 AND log_id = $2 \
                  AND ((date AT TIME ZONE 'UTC')::date) = ((now() AT TIME ZONE 'UTC')::date) \
             )",
        )
        .bind(member_id)
        .bind(log_id)
        .fetch_one(executor)
        .await
    }
}

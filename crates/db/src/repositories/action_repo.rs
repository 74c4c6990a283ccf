//! Repository for the `actions` catalog table.

use sqlx::{PgConnection, PgPool};
use tally_core::points::{ModificationKind, BONUS_ACTION_NAME, DISCOUNT_ACTION_NAME};
use tally_core::types::DbId;

use crate::models::action::{
    Action, ActionUsage, CategorizedActions, CreateAction, CATEGORY_BONUS, CATEGORY_DEPARTMENT,
    CATEGORY_MEMBER,
};

/// Column list for `actions` queries.
const ACTION_COLUMNS: &str = "id, name, arabic_name, category, points, created_at, updated_at";

/// Provides read/write operations for the action catalog.
pub struct ActionRepo;

impl ActionRepo {
    /// List all actions ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Action>, sqlx::Error> {
        let query = format!("SELECT {ACTION_COLUMNS} FROM actions ORDER BY id");
        sqlx::query_as::<_, Action>(&query).fetch_all(pool).await
    }

    /// Find an action by id.
    pub async fn get(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Action>, sqlx::Error> {
        let query = format!("SELECT {ACTION_COLUMNS} FROM actions WHERE id = $1");
        sqlx::query_as::<_, Action>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Insert a new action. Names are not unique on purpose: display names
    /// may repeat across categories.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        create: &CreateAction,
    ) -> Result<Action, sqlx::Error> {
        let query = format!(
            "INSERT INTO actions (name, arabic_name, category, points) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ACTION_COLUMNS}"
        );
        sqlx::query_as::<_, Action>(&query)
            .bind(&create.name)
            .bind(&create.arabic_name)
            .bind(&create.category)
            .bind(create.points)
            .fetch_one(executor)
            .await
    }

    /// Per-action log reference counts, for admin tooling (which actions are
    /// safe to retire).
    pub async fn usage_counts(pool: &PgPool) -> Result<Vec<ActionUsage>, sqlx::Error> {
        sqlx::query_as::<_, ActionUsage>(
            "SELECT a.id AS action_id, COUNT(l.id)::BIGINT AS log_count \
             FROM actions a \
             LEFT JOIN logs l ON l.action_id = a.id \
             GROUP BY a.id \
             ORDER BY a.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Get or lazily create the reserved ad-hoc container action for `kind`
    /// ("Bonus" or "Discount", zero base points).
    ///
    /// Always runs inside the caller's transaction, so the losing side of a
    /// concurrent create must not error: a failed INSERT would abort the
    /// whole transaction and poison every later statement. The insert is
    /// `ON CONFLICT DO NOTHING` against the partial unique index instead;
    /// a loser gets no row back and reads the winner's row with a plain
    /// select once the winner has committed.
    pub async fn get_or_create_reserved(
        conn: &mut PgConnection,
        kind: ModificationKind,
    ) -> Result<Action, sqlx::Error> {
        let name = match kind {
            ModificationKind::Bonus => BONUS_ACTION_NAME,
            ModificationKind::Discount => DISCOUNT_ACTION_NAME,
        };
        let query = format!("SELECT {ACTION_COLUMNS} FROM actions WHERE name = $1");
        if let Some(action) = sqlx::query_as::<_, Action>(&query)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?
        {
            return Ok(action);
        }

        // The conflict target must name the partial index's predicate.
        let insert = format!(
            "INSERT INTO actions (name, arabic_name, category, points) \
             VALUES ($1, '', $2, 0) \
             ON CONFLICT (name) \
                WHERE name IN ('{BONUS_ACTION_NAME}', '{DISCOUNT_ACTION_NAME}') \
                DO NOTHING \
             RETURNING {ACTION_COLUMNS}"
        );
        if let Some(action) = sqlx::query_as::<_, Action>(&insert)
            .bind(name)
            .bind(CATEGORY_BONUS)
            .fetch_optional(&mut *conn)
            .await?
        {
            return Ok(action);
        }

        sqlx::query_as::<_, Action>(&query)
            .bind(name)
            .fetch_one(&mut *conn)
            .await
    }

    /// Group the catalog for the points-granting UI.
    ///
    /// `composite_pairs` is the configured (department action, member action)
    /// pairing; a pair appears only when both sides exist. Actions consumed
    /// by a pair are excluded from the standalone lists.
    pub async fn list_categorized(
        pool: &PgPool,
        composite_pairs: &[(DbId, DbId)],
    ) -> Result<CategorizedActions, sqlx::Error> {
        let actions = Self::list(pool).await?;

        let by_id = |id: DbId| actions.iter().find(|a| a.id == id).cloned();
        let mut composite_actions = Vec::new();
        for &(dept_id, member_id) in composite_pairs {
            if let (Some(dept), Some(member)) = (by_id(dept_id), by_id(member_id)) {
                composite_actions.push((dept, member));
            }
        }

        let paired: Vec<DbId> = composite_pairs
            .iter()
            .flat_map(|&(d, m)| [d, m])
            .collect();
        let standalone: Vec<&Action> = actions.iter().filter(|a| !paired.contains(&a.id)).collect();

        Ok(CategorizedActions {
            composite_actions,
            department_actions: standalone
                .iter()
                .filter(|a| a.category == CATEGORY_DEPARTMENT)
                .map(|a| (*a).clone())
                .collect(),
            member_actions: standalone
                .iter()
                .filter(|a| a.category == CATEGORY_MEMBER)
                .map(|a| (*a).clone())
                .collect(),
            custom_actions: standalone
                .iter()
                .filter(|a| a.category == CATEGORY_BONUS)
                .map(|a| (*a).clone())
                .collect(),
        })
    }
}

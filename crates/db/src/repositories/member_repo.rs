//! Repository for the `members` table.
//!
//! `uni_id` is the natural key. Roster ingestion upserts by it with an
//! explicit find-then-branch so the update path is visible in the code,
//! never hidden behind merge semantics.

use sqlx::{PgConnection, PgPool};
use tally_core::types::DbId;

use crate::models::member::{CreateMember, Member};

/// Column list for `members` queries.
const MEMBER_COLUMNS: &str = "id, name, email, phone_number, uni_id, gender, uni_level, \
                              uni_college, is_authenticated, created_at, updated_at";

/// Provides read/write operations for members.
pub struct MemberRepo;

impl MemberRepo {
    /// List all members ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!("SELECT {MEMBER_COLUMNS} FROM members ORDER BY name, id");
        sqlx::query_as::<_, Member>(&query).fetch_all(pool).await
    }

    /// Find a member by id.
    pub async fn get(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a member by university id.
    pub async fn get_by_uni_id(
        executor: impl sqlx::PgExecutor<'_>,
        uni_id: &str,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE uni_id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(uni_id)
            .fetch_optional(executor)
            .await
    }

    /// Insert a new member.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        create: &CreateMember,
    ) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members \
                (name, email, phone_number, uni_id, gender, uni_level, uni_college) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(&create.name)
            .bind(&create.email)
            .bind(&create.phone_number)
            .bind(&create.uni_id)
            .bind(&create.gender)
            .bind(create.uni_level)
            .bind(&create.uni_college)
            .fetch_one(executor)
            .await
    }

    /// Replace a member's profile fields by id.
    pub async fn update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        update: &CreateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET \
                name = $2, email = $3, phone_number = $4, uni_id = $5, gender = $6, \
                uni_level = $7, uni_college = $8, updated_at = now() \
             WHERE id = $1 \
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(&update.name)
            .bind(&update.email)
            .bind(&update.phone_number)
            .bind(&update.uni_id)
            .bind(&update.gender)
            .bind(update.uni_level)
            .bind(&update.uni_college)
            .fetch_optional(executor)
            .await
    }

    /// Find by `uni_id` and update the profile, or create the member if
    /// absent. Null/empty incoming contact fields never clobber existing
    /// values (roster sheets are frequently sparse).
    pub async fn upsert_by_uni_id(
        conn: &mut PgConnection,
        create: &CreateMember,
    ) -> Result<Member, sqlx::Error> {
        match Self::get_by_uni_id(&mut *conn, &create.uni_id).await? {
            Some(existing) => {
                let query = format!(
                    "UPDATE members SET \
                        name = $2, \
                        email = COALESCE($3, email), \
                        phone_number = COALESCE($4, phone_number), \
                        gender = $5, \
                        uni_level = $6, \
                        uni_college = CASE WHEN $7 = '' THEN uni_college ELSE $7 END, \
                        updated_at = now() \
                     WHERE id = $1 \
                     RETURNING {MEMBER_COLUMNS}"
                );
                sqlx::query_as::<_, Member>(&query)
                    .bind(existing.id)
                    .bind(&create.name)
                    .bind(&create.email)
                    .bind(&create.phone_number)
                    .bind(&create.gender)
                    .bind(create.uni_level)
                    .bind(&create.uni_college)
                    .fetch_one(&mut *conn)
                    .await
            }
            None => Self::create(&mut *conn, create).await,
        }
    }
}

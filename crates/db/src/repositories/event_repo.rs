//! Repository for the `events` table.

use sqlx::PgPool;
use tally_core::types::DbId;

use crate::models::event::{CreateEvent, Event, OpenEvent, UpdateEvent};

/// Column list for `events` queries.
const EVENT_COLUMNS: &str = "id, name, location_type, location, start_datetime, end_datetime, \
                             status, is_official, description, image_url, created_at, updated_at";

/// Provides read/write operations for events.
pub struct EventRepo;

impl EventRepo {
    /// List events newest-first by start date.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             ORDER BY start_datetime DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find an event by id.
    pub async fn get(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// True when an event with this name already exists. Writers pre-check
    /// so a duplicate surfaces as a structured conflict; the `uq_events_name`
    /// constraint backstops the race.
    pub async fn name_exists(
        executor: impl sqlx::PgExecutor<'_>,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE name = $1)")
            .bind(name)
            .fetch_one(executor)
            .await
    }

    /// Insert a new event.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        create: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events \
                (name, location_type, location, start_datetime, end_datetime, status, \
                 is_official, description, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&create.name)
            .bind(&create.location_type)
            .bind(&create.location)
            .bind(create.start_datetime)
            .bind(create.end_datetime)
            .bind(&create.status)
            .bind(create.is_official)
            .bind(&create.description)
            .bind(&create.image_url)
            .fetch_one(executor)
            .await
    }

    /// Replace an event's fields by id.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        update: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET \
                name = $2, location_type = $3, location = $4, start_datetime = $5, \
                end_datetime = $6, status = $7, is_official = $8, description = $9, \
                image_url = $10, updated_at = now() \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&update.name)
            .bind(&update.location_type)
            .bind(&update.location)
            .bind(update.start_datetime)
            .bind(update.end_datetime)
            .bind(&update.status)
            .bind(update.is_official)
            .bind(&update.description)
            .bind(&update.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Move an event through its lifecycle (`draft`/`open`/`active`/`closed`).
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET status = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event. Logs, forms, and their association rows cascade.
    /// Returns `false` if no row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List open (registrable) events joined with their form.
    pub async fn list_open(pool: &PgPool) -> Result<Vec<OpenEvent>, sqlx::Error> {
        sqlx::query_as::<_, OpenEvent>(
            "SELECT e.id, e.name, e.location_type, e.location, e.start_datetime, \
                    e.end_datetime, e.status, e.is_official, e.description, e.image_url, \
                    f.id AS form_id, f.form_type, f.responders_url \
             FROM events e \
             JOIN forms f ON f.event_id = e.id \
             WHERE e.status = 'open' \
             ORDER BY e.start_datetime",
        )
        .fetch_all(pool)
        .await
    }
}

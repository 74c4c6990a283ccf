//! Repository for the `forms` table.

use sqlx::PgPool;
use tally_core::types::DbId;

use crate::models::form::{CreateForm, Form};

/// Column list for `forms` queries.
const FORM_COLUMNS: &str =
    "id, event_id, form_type, external_form_id, responders_url, created_at, updated_at";

/// Provides read/write operations for registration forms.
pub struct FormRepo;

impl FormRepo {
    /// Find a form by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {FORM_COLUMNS} FROM forms WHERE id = $1");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the form attached to an event, if any.
    pub async fn get_by_event(
        executor: impl sqlx::PgExecutor<'_>,
        event_id: DbId,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {FORM_COLUMNS} FROM forms WHERE event_id = $1");
        sqlx::query_as::<_, Form>(&query)
            .bind(event_id)
            .fetch_optional(executor)
            .await
    }

    /// Insert a form. At most one per event (`uq_forms_event`).
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        create: &CreateForm,
    ) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (event_id, form_type, external_form_id, responders_url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {FORM_COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(create.event_id)
            .bind(&create.form_type)
            .bind(&create.external_form_id)
            .bind(&create.responders_url)
            .fetch_one(executor)
            .await
    }

    /// Delete a form. Returns `false` if no row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

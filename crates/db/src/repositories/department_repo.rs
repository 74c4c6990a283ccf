//! Repository for the `departments` table.

use sqlx::PgPool;
use tally_core::types::DbId;

use crate::models::department::{CreateDepartment, Department};

/// Column list for `departments` queries.
const DEPARTMENT_COLUMNS: &str = "id, name, arabic_name, category, created_at, updated_at";

/// Provides read/write operations for departments.
pub struct DepartmentRepo;

impl DepartmentRepo {
    /// List all departments ordered by category then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY category, name");
        sqlx::query_as::<_, Department>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a department by id.
    pub async fn get(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1");
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Insert a new department.
    pub async fn create(
        pool: &PgPool,
        create: &CreateDepartment,
    ) -> Result<Department, sqlx::Error> {
        let query = format!(
            "INSERT INTO departments (name, arabic_name, category) \
             VALUES ($1, $2, $3) \
             RETURNING {DEPARTMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(&create.name)
            .bind(&create.arabic_name)
            .bind(&create.category)
            .fetch_one(pool)
            .await
    }

    /// Delete a department. Returns `false` if no row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::traits::{Page, Repository};
use crate::core::{AppError, Result};
use crate::modules::processes::models::Process;

/// Process persistence over the `processes` table.
///
/// Deletes are soft (`deleted_at`); deleted rows are invisible to every query.
#[derive(Clone)]
pub struct PgProcessRepository {
    pool: PgPool,
}

impl PgProcessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Process, i64> for PgProcessRepository {
    async fn create(&self, process: Process) -> Result<Process> {
        let created = sqlx::query_as::<_, Process>(
            r#"
            INSERT INTO processes (name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&process.name)
        .bind(&process.description)
        .bind(process.created_at)
        .bind(process.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Process>> {
        let process = sqlx::query_as::<_, Process>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM processes
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(process)
    }

    async fn update(&self, id: i64, process: Process) -> Result<Process> {
        sqlx::query_as::<_, Process>(
            r#"
            UPDATE processes
            SET name = $1, description = $2, updated_at = NOW()
            WHERE id = $3 AND deleted_at IS NULL
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&process.name)
        .bind(&process.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("process not found"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE processes
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("process not found"));
        }

        Ok(())
    }

    async fn list(&self, page: Page) -> Result<Vec<Process>> {
        let processes = sqlx::query_as::<_, Process>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM processes
            WHERE deleted_at IS NULL
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit()))
        .bind(i64::from(page.offset()))
        .fetch_all(&self.pool)
        .await?;

        Ok(processes)
    }
}

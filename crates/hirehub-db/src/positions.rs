//! Job position repository implementation.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use hirehub_core::{
    CreatePositionRequest, Error, JobPosition, ListPositionsRequest, PositionRepository, Result,
    UpdatePositionRequest,
};

use crate::defaults_limit;

/// PostgreSQL implementation of PositionRepository.
pub struct PgPositionRepository {
    pool: Pool<Postgres>,
}

impl PgPositionRepository {
    /// Create a new PgPositionRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_position(row: &sqlx::postgres::PgRow) -> JobPosition {
    JobPosition {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        requirements: row.get("requirements"),
        tags: row.get("tags"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        embedding: row.get("embedding"),
    }
}

#[async_trait]
impl PositionRepository for PgPositionRepository {
    async fn insert(&self, req: CreatePositionRequest) -> Result<Uuid> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO job_position (id, title, description, requirements, tags, is_active)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.requirements)
        .bind(&req.tags)
        .bind(req.is_active)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<JobPosition> {
        self.fetch_optional(id)
            .await?
            .ok_or(Error::PositionNotFound(id))
    }

    async fn fetch_optional(&self, id: Uuid) -> Result<Option<JobPosition>> {
        let row = sqlx::query(
            "SELECT id, title, description, requirements, tags, is_active, created_at, embedding
             FROM job_position
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(row_to_position))
    }

    async fn list(&self, req: ListPositionsRequest) -> Result<Vec<JobPosition>> {
        let (limit, offset) = defaults_limit(req.limit, req.offset);

        let rows = sqlx::query(
            "SELECT id, title, description, requirements, tags, is_active, created_at, embedding
             FROM job_position
             WHERE ($1::boolean IS FALSE OR is_active)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(req.active_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(row_to_position).collect())
    }

    async fn update(&self, id: Uuid, req: UpdatePositionRequest) -> Result<()> {
        let result = sqlx::query(
            "UPDATE job_position
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 requirements = COALESCE($4, requirements),
                 tags = COALESCE($5, tags),
                 is_active = COALESCE($6, is_active)
             WHERE id = $1",
        )
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.requirements)
        .bind(req.tags)
        .bind(req.is_active)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::PositionNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // Applicant rows are detached by the ON DELETE SET NULL constraint.
        let result = sqlx::query("DELETE FROM job_position WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::PositionNotFound(id));
        }
        Ok(())
    }

    async fn set_embedding(&self, id: Uuid, vector: &Vector) -> Result<()> {
        let result = sqlx::query("UPDATE job_position SET embedding = $2 WHERE id = $1")
            .bind(id)
            .bind(vector)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::PositionNotFound(id));
        }
        Ok(())
    }

    async fn list_all_ids(&self) -> Result<Vec<Uuid>> {
        let rows = sqlx::query("SELECT id FROM job_position ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(|row| row.get("id")).collect())
    }
}

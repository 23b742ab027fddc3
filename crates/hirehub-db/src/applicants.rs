//! Applicant repository implementation.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use hirehub_core::{
    Applicant, ApplicantRepository, CreateApplicantRequest, Error, ListApplicantsRequest, Result,
    UpdateApplicantRequest,
};

use crate::{defaults_limit, escape_like};

/// PostgreSQL implementation of ApplicantRepository.
pub struct PgApplicantRepository {
    pool: Pool<Postgres>,
}

impl PgApplicantRepository {
    /// Create a new PgApplicantRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const APPLICANT_COLUMNS: &str = "id, name, email, phone, position_id, stage, source, tags, \
     resume_text, interviewers, interview_dates, overall_feedback, final_decision, \
     created_at, updated_at, embedding";

fn row_to_applicant(row: &sqlx::postgres::PgRow) -> Result<Applicant> {
    let stage: String = row.get("stage");
    let source: String = row.get("source");
    Ok(Applicant {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        position_id: row.get("position_id"),
        stage: stage.parse().map_err(Error::Internal)?,
        source: source.parse().map_err(Error::Internal)?,
        tags: row.get("tags"),
        resume_text: row.get("resume_text"),
        interviewers: row.get("interviewers"),
        interview_dates: row.get("interview_dates"),
        overall_feedback: row.get("overall_feedback"),
        final_decision: row.get("final_decision"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        embedding: row.get("embedding"),
    })
}

/// Map a user-supplied ordering key to a whitelisted ORDER BY clause.
///
/// Unknown keys fall back to the default (newest first) rather than
/// erroring; the secondary `id` key keeps pagination stable across rows
/// with identical timestamps.
pub fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering.unwrap_or("-created_at") {
        "created_at" => "created_at ASC, id ASC",
        "name" => "name ASC, id ASC",
        "-name" => "name DESC, id ASC",
        "updated_at" => "updated_at ASC, id ASC",
        "-updated_at" => "updated_at DESC, id ASC",
        _ => "created_at DESC, id ASC",
    }
}

#[async_trait]
impl ApplicantRepository for PgApplicantRepository {
    async fn insert(&self, req: CreateApplicantRequest) -> Result<Uuid> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO applicant (id, name, email, phone, position_id, stage, source, tags,
                                    resume_text, interviewers, interview_dates,
                                    overall_feedback, final_decision)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(req.position_id)
        .bind(req.stage.to_string())
        .bind(req.source.to_string())
        .bind(&req.tags)
        .bind(&req.resume_text)
        .bind(&req.interviewers)
        .bind(&req.interview_dates)
        .bind(&req.overall_feedback)
        .bind(&req.final_decision)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Applicant> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM applicant WHERE id = $1",
            APPLICANT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => row_to_applicant(&row),
            None => Err(Error::ApplicantNotFound(id)),
        }
    }

    async fn list(&self, req: ListApplicantsRequest) -> Result<Vec<Applicant>> {
        let (limit, offset) = defaults_limit(req.limit, req.offset);
        let pattern = req
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("%{}%", escape_like(s.trim())));

        let query = format!(
            "SELECT {} FROM applicant
             WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1 OR tags ILIKE $1)
               AND ($2::text IS NULL OR stage = $2)
               AND ($3::text IS NULL OR source = $3)
               AND ($4::uuid IS NULL OR position_id = $4)
             ORDER BY {}
             LIMIT $5 OFFSET $6",
            APPLICANT_COLUMNS,
            order_clause(req.ordering.as_deref()),
        );

        let rows = sqlx::query(&query)
            .bind(pattern)
            .bind(req.stage.map(|s| s.to_string()))
            .bind(req.source.map(|s| s.to_string()))
            .bind(req.position_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter().map(row_to_applicant).collect()
    }

    async fn update(&self, id: Uuid, req: UpdateApplicantRequest) -> Result<()> {
        // position_id distinguishes "absent" (keep) from "null" (detach),
        // so it gets an explicit change flag instead of COALESCE.
        let (change_position, new_position) = match req.position_id {
            Some(inner) => (true, inner),
            None => (false, None),
        };

        let result = sqlx::query(
            "UPDATE applicant
             SET name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 phone = COALESCE($4, phone),
                 position_id = CASE WHEN $5 THEN $6 ELSE position_id END,
                 stage = COALESCE($7, stage),
                 source = COALESCE($8, source),
                 tags = COALESCE($9, tags),
                 resume_text = COALESCE($10, resume_text),
                 interviewers = COALESCE($11, interviewers),
                 interview_dates = COALESCE($12, interview_dates),
                 overall_feedback = COALESCE($13, overall_feedback),
                 final_decision = COALESCE($14, final_decision),
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(req.name)
        .bind(req.email)
        .bind(req.phone)
        .bind(change_position)
        .bind(new_position)
        .bind(req.stage.map(|s| s.to_string()))
        .bind(req.source.map(|s| s.to_string()))
        .bind(req.tags)
        .bind(req.resume_text)
        .bind(req.interviewers)
        .bind(req.interview_dates)
        .bind(req.overall_feedback)
        .bind(req.final_decision)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ApplicantNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM applicant WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ApplicantNotFound(id));
        }
        Ok(())
    }

    async fn set_embedding(&self, id: Uuid, vector: &Vector) -> Result<()> {
        let result = sqlx::query("UPDATE applicant SET embedding = $2 WHERE id = $1")
            .bind(id)
            .bind(vector)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ApplicantNotFound(id));
        }
        Ok(())
    }

    async fn list_embedded(&self, position_id: Option<Uuid>) -> Result<Vec<(Uuid, Vector)>> {
        let rows = sqlx::query(
            "SELECT id, embedding FROM applicant
             WHERE embedding IS NOT NULL
               AND ($1::uuid IS NULL OR position_id = $1)
             ORDER BY id",
        )
        .bind(position_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .iter()
            .map(|row| (row.get("id"), row.get("embedding")))
            .collect())
    }

    async fn list_all_ids(&self) -> Result<Vec<Uuid>> {
        let rows = sqlx::query("SELECT id FROM applicant ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(|row| row.get("id")).collect())
    }
}

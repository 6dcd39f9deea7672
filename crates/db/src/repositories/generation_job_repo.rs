//! Repository for the `generation_jobs` table -- the job status store.
//!
//! Updates are idempotent overwrites of the single current-status row.
//! A guarded UPDATE keeps the lifecycle monotonic: once a row is
//! completed or error, later writes are ignored (last-write-wins applies
//! only between non-terminal writes).

use sqlx::PgPool;

use costumier_core::types::JobId;

use crate::models::generation_job::{GenerationJob, NewGenerationJob};
use crate::models::status::JobStatus;

/// Column list for `generation_jobs` queries.
const COLUMNS: &str = "\
    id, status_id, message, prompt, style, image_count, result, \
    created_at, updated_at, completed_at";

/// Provides CRUD operations for generation job rows.
pub struct GenerationJobRepo;

impl GenerationJobRepo {
    /// Create a job row in `started` with an initial progress message.
    ///
    /// The job ID is generated here (UUID v7) and returned to the caller
    /// as the polling handle.
    pub async fn create(
        pool: &PgPool,
        input: &NewGenerationJob,
    ) -> Result<GenerationJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO generation_jobs (id, status_id, message, prompt, style, image_count) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationJob>(&query)
            .bind(uuid::Uuid::now_v7())
            .bind(JobStatus::Started.id())
            .bind(&input.message)
            .bind(&input.prompt)
            .bind(&input.style)
            .bind(input.image_count)
            .fetch_one(pool)
            .await
    }

    /// Overwrite status, message, and result for a job.
    ///
    /// Rows already in a terminal status are left untouched; returns
    /// `true` if the row was written. Writing a terminal status also sets
    /// `completed_at`.
    pub async fn update_status(
        pool: &PgPool,
        job_id: JobId,
        status: JobStatus,
        message: &str,
        result: Option<&serde_json::Value>,
    ) -> Result<bool, sqlx::Error> {
        let outcome = sqlx::query(
            "UPDATE generation_jobs \
             SET status_id = $2, message = $3, result = $4, updated_at = NOW(), \
                 completed_at = CASE WHEN $5 THEN NOW() ELSE completed_at END \
             WHERE id = $1 AND status_id NOT IN ($6, $7)",
        )
        .bind(job_id)
        .bind(status.id())
        .bind(message)
        .bind(result)
        .bind(status.is_terminal())
        .bind(JobStatus::Completed.id())
        .bind(JobStatus::Error.id())
        .execute(pool)
        .await?;
        Ok(outcome.rows_affected() > 0)
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: JobId) -> Result<Option<GenerationJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generation_jobs WHERE id = $1");
        sqlx::query_as::<_, GenerationJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

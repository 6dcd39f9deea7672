//! Repository for the `processing_queue` table.
//!
//! The queue hands submitted work from the API process to whichever
//! dispatcher claims it first. `claim_next` uses
//! `SELECT FOR UPDATE SKIP LOCKED` so concurrent dispatchers never
//! double-claim a row.

use sqlx::PgPool;

use costumier_core::types::DbId;

use crate::models::queue::{EnqueueJob, QueuedJob};
use crate::models::status::QueueStatus;

/// Column list for `processing_queue` queries.
const COLUMNS: &str = "\
    id, job_id, images, prompt, style, status_id, claimed_at, created_at";

/// Provides dispatch operations for queued generation work.
pub struct QueueRepo;

impl QueueRepo {
    /// Insert a pending queue row for a freshly created job.
    pub async fn enqueue(pool: &PgPool, input: &EnqueueJob) -> Result<QueuedJob, sqlx::Error> {
        let images = serde_json::Value::from(
            input
                .images
                .iter()
                .map(|i| serde_json::Value::String(i.clone()))
                .collect::<Vec<_>>(),
        );
        let query = format!(
            "INSERT INTO processing_queue (job_id, images, prompt, style, status_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueuedJob>(&query)
            .bind(input.job_id)
            .bind(images)
            .bind(&input.prompt)
            .bind(&input.style)
            .bind(QueueStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the oldest pending row, if any.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<QueuedJob>, sqlx::Error> {
        let query = format!(
            "UPDATE processing_queue \
             SET status_id = $1, claimed_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM processing_queue \
                 WHERE status_id = $2 \
                 ORDER BY created_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueuedJob>(&query)
            .bind(QueueStatus::Processing.id())
            .bind(QueueStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Mark a claimed row as processed. The image payload is cleared so
    /// transient upload data does not outlive the job.
    pub async fn mark_completed(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE processing_queue \
             SET status_id = $2, images = '[]'::jsonb \
             WHERE id = $1",
        )
        .bind(id)
        .bind(QueueStatus::Completed.id())
        .execute(pool)
        .await?;
        Ok(())
    }
}

//! Abstraction over the job status store.
//!
//! The orchestrator writes status rows through this trait so tests can
//! observe the lifecycle without a database.

use costumier_core::error::CoreError;
use costumier_core::types::JobId;
use costumier_db::models::status::JobStatus;
use costumier_db::repositories::GenerationJobRepo;
use costumier_db::DbPool;

/// Writer side of the job status store.
#[async_trait::async_trait]
pub trait StatusStore: Send + Sync {
    /// Overwrite status, message, and result for a job. Idempotent;
    /// writes against a terminal row are ignored.
    async fn update(
        &self,
        job_id: JobId,
        status: JobStatus,
        message: &str,
        result: Option<&serde_json::Value>,
    ) -> Result<(), CoreError>;
}

/// Production status store backed by Postgres.
pub struct PgStatusStore {
    pool: DbPool,
}

impl PgStatusStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StatusStore for PgStatusStore {
    async fn update(
        &self,
        job_id: JobId,
        status: JobStatus,
        message: &str,
        result: Option<&serde_json::Value>,
    ) -> Result<(), CoreError> {
        let written =
            GenerationJobRepo::update_status(&self.pool, job_id, status, message, result)
                .await
                .map_err(|e| CoreError::Internal(format!("status write failed: {e}")))?;

        if !written {
            tracing::debug!(
                %job_id,
                status = status.name(),
                "Status write skipped: job already terminal or unknown",
            );
        }
        Ok(())
    }
}

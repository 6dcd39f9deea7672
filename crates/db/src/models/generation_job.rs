//! Job status store entity: one row per generation job.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use costumier_core::types::{JobId, Timestamp};

use super::status::{JobStatus, StatusId};

/// A row from the `generation_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationJob {
    pub id: JobId,
    pub status_id: StatusId,
    pub message: String,
    pub prompt: String,
    pub style: String,
    pub image_count: i32,
    pub result: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl GenerationJob {
    /// Decode the status column. `None` only if the row carries an ID
    /// outside the seeded range, which indicates a corrupted row.
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::from_id(self.status_id)
    }
}

/// DTO for creating a job row (always starts in `started`).
#[derive(Debug, Clone, Deserialize)]
pub struct NewGenerationJob {
    pub prompt: String,
    pub style: String,
    pub image_count: i32,
    pub message: String,
}

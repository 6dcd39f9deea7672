//! Processing queue entity: pending work handed from the API to a
//! dispatcher.

use serde::Serialize;
use sqlx::FromRow;

use costumier_core::types::{DbId, JobId, Timestamp};

use super::status::StatusId;

/// A row from the `processing_queue` table.
///
/// `images` holds the submitted data URLs as a JSON array; the payload is
/// transient and the row is marked completed once the job reaches a
/// terminal status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueuedJob {
    pub id: DbId,
    pub job_id: JobId,
    pub images: serde_json::Value,
    pub prompt: String,
    pub style: String,
    pub status_id: StatusId,
    pub claimed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl QueuedJob {
    /// Decode the JSON image array back into data-URL strings.
    pub fn image_list(&self) -> Vec<String> {
        serde_json::from_value(self.images.clone()).unwrap_or_default()
    }
}

/// DTO for enqueuing a claimed-later unit of work.
#[derive(Debug, Clone)]
pub struct EnqueueJob {
    pub job_id: JobId,
    pub images: Vec<String>,
    pub prompt: String,
    pub style: String,
}

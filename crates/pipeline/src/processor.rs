//! The job orchestrator: one sequential chain of suspending I/O calls
//! driving a generation job to a terminal status.
//!
//! Stage order: validate → archive → upload → generate → complete. Every
//! stage is preceded by a status write; any failure becomes a terminal
//! `error` status with a classified message, so a job is never left in
//! `started` or `processing` after [`JobProcessor::process`] returns.

use std::sync::Arc;
use std::time::Duration;

use costumier_core::archive::{build_archive, ARCHIVE_CONTENT_TYPE};
use costumier_core::encoding::{decode_data_url, probe_dimensions, validate_image};
use costumier_core::error::CoreError;
use costumier_core::style::PhotomakerStyle;
use costumier_core::types::JobId;
use costumier_db::models::status::JobStatus;
use costumier_photomaker::{GenerationBackend, GenerationRequest, GenerationResult};
use costumier_storage::BlobStore;

use crate::status_store::StatusStore;

/// Overall pipeline deadline. Slightly under the platform's five-minute
/// request ceiling so the timeout status is written by us, not by an
/// infrastructure kill.
pub const PIPELINE_DEADLINE: Duration = Duration::from_secs(270);

/// Status message written when a job completes.
const COMPLETED_MESSAGE: &str = "Image generated successfully!";

/// Drives one generation job through the pipeline.
pub struct JobProcessor {
    status: Arc<dyn StatusStore>,
    blobs: Arc<dyn BlobStore>,
    backend: Arc<dyn GenerationBackend>,
    deadline: Duration,
}

impl JobProcessor {
    pub fn new(
        status: Arc<dyn StatusStore>,
        blobs: Arc<dyn BlobStore>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            status,
            blobs,
            backend,
            deadline: PIPELINE_DEADLINE,
        }
    }

    /// Override the pipeline deadline (tests use short deadlines).
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Process a job to a terminal status.
    ///
    /// On success the result has been written to the status store and is
    /// also returned for sync callers. On failure the terminal `error`
    /// status carries the classified user-facing message, and the error
    /// is returned for logging/mapping. Transient per-job storage is
    /// cleaned up on both paths.
    pub async fn process(
        &self,
        job_id: JobId,
        images: &[String],
        prompt: &str,
        style: PhotomakerStyle,
    ) -> Result<GenerationResult, CoreError> {
        tracing::info!(%job_id, image_count = images.len(), style = %style, "Starting job");

        let outcome = match tokio::time::timeout(
            self.deadline,
            self.run(job_id, images, prompt, style),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(CoreError::RemoteTimeout(format!(
                "pipeline exceeded the {:?} deadline",
                self.deadline
            ))),
        };

        let outcome = self.finish(job_id, outcome).await;

        // Transient uploads are removed no matter how the job ended.
        self.cleanup(job_id).await;

        outcome
    }

    /// Write the terminal status for a finished pipeline run.
    async fn finish(
        &self,
        job_id: JobId,
        outcome: Result<GenerationResult, CoreError>,
    ) -> Result<GenerationResult, CoreError> {
        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                self.mark_failed(job_id, &err).await;
                return Err(err);
            }
        };

        let payload = match serde_json::to_value(&result) {
            Ok(payload) => payload,
            Err(e) => {
                let err = CoreError::Internal(format!("result serialization: {e}"));
                self.mark_failed(job_id, &err).await;
                return Err(err);
            }
        };

        self.status
            .update(job_id, JobStatus::Completed, COMPLETED_MESSAGE, Some(&payload))
            .await?;
        tracing::info!(%job_id, image_count = result.images.len(), "Job completed");
        Ok(result)
    }

    /// Write a terminal `error` status for a job. A failed status write
    /// is logged rather than propagated: the job error itself is the one
    /// the caller needs to see.
    pub async fn mark_failed(&self, job_id: JobId, err: &CoreError) {
        tracing::error!(%job_id, error = %err, transient = err.is_transient(), "Job failed");
        if let Err(write_err) = self
            .status
            .update(job_id, JobStatus::Error, &err.user_message(), None)
            .await
        {
            tracing::error!(%job_id, error = %write_err, "Failed to write error status");
        }
    }

    async fn cleanup(&self, job_id: JobId) {
        if let Err(err) = self.blobs.delete_prefix(&format!("jobs/{job_id}")).await {
            // Cleanup failure never clobbers the job outcome; the blobs
            // are orphaned, not the job.
            tracing::warn!(%job_id, error = %err, "Failed to delete transient uploads");
        }
    }

    async fn run(
        &self,
        job_id: JobId,
        images: &[String],
        prompt: &str,
        style: PhotomakerStyle,
    ) -> Result<GenerationResult, CoreError> {
        // Validation happens before anything leaves the process; a
        // rejected upload never causes a remote call.
        let mut decoded = Vec::with_capacity(images.len());
        for image in images {
            let img = decode_data_url(image)?;
            validate_image(&img)?;
            if let Some((width, height)) = probe_dimensions(&img.bytes) {
                tracing::debug!(%job_id, width, height, "Validated upload");
            }
            decoded.push(img);
        }

        self.status
            .update(job_id, JobStatus::Processing, "Building archive...", None)
            .await?;
        let archive = build_archive(&decoded)?;

        self.status
            .update(job_id, JobStatus::Processing, "Uploading images...", None)
            .await?;
        let key = format!("jobs/{job_id}/images.zip");
        let archive_url = self
            .blobs
            .put(&key, ARCHIVE_CONTENT_TYPE, archive.bytes)
            .await
            .map_err(CoreError::from)?;

        self.status
            .update(job_id, JobStatus::Processing, "Generating with AI...", None)
            .await?;
        let request = GenerationRequest {
            image_archive_url: archive_url,
            prompt: prompt.to_string(),
            style,
        };
        let result = self
            .backend
            .generate(&request)
            .await
            .map_err(CoreError::from)?;

        Ok(result)
    }
}

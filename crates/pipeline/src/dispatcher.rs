//! Queue dispatcher: a long-lived task pulling submitted jobs off the
//! processing queue and running them through the pipeline.
//!
//! Claims use `FOR UPDATE SKIP LOCKED`, so any number of dispatcher
//! instances (API process, standalone workers) can run against the same
//! queue without double-dispatch.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use costumier_core::style::PhotomakerStyle;
use costumier_db::repositories::QueueRepo;
use costumier_db::DbPool;

use crate::processor::JobProcessor;

/// Default polling interval for the dispatcher loop.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls the processing queue and runs claimed jobs sequentially.
pub struct Dispatcher {
    pool: DbPool,
    processor: Arc<JobProcessor>,
    poll_interval: Duration,
}

impl Dispatcher {
    /// Create a dispatcher with the default 1-second poll interval.
    pub fn new(pool: DbPool, processor: Arc<JobProcessor>) -> Self {
        Self {
            pool,
            processor,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Run the dispatch loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Dispatcher started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Dispatcher shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.drain_queue().await {
                        tracing::error!(error = %e, "Dispatch cycle failed");
                    }
                }
            }
        }
    }

    /// Claim and process rows until the queue is empty.
    async fn drain_queue(&self) -> Result<(), sqlx::Error> {
        while let Some(queued) = QueueRepo::claim_next(&self.pool).await? {
            tracing::info!(
                queue_id = queued.id,
                job_id = %queued.job_id,
                "Claimed queued job",
            );

            // The style was validated at submission; a parse failure here
            // means the row was tampered with or predates a style change.
            match PhotomakerStyle::parse(&queued.style) {
                Ok(style) => {
                    let images = queued.image_list();
                    if let Err(e) = self
                        .processor
                        .process(queued.job_id, &images, &queued.prompt, style)
                        .await
                    {
                        tracing::error!(job_id = %queued.job_id, error = %e, "Job ended in error");
                    }
                }
                Err(e) => {
                    self.processor.mark_failed(queued.job_id, &e).await;
                }
            }

            QueueRepo::mark_completed(&self.pool, queued.id).await?;
        }
        Ok(())
    }
}

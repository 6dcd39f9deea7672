//! Standalone dispatcher binary.
//!
//! Runs the same queue dispatcher the API process embeds, for
//! deployments that keep generation work off the serving process. Any
//! number of workers can run against one queue; `SKIP LOCKED` claims
//! keep them from double-dispatching.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use costumier_photomaker::{PhotomakerClient, PhotomakerConfig};
use costumier_pipeline::{Dispatcher, JobProcessor, PgStatusStore};
use costumier_storage::{HttpObjectStore, StorageConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "costumier_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = costumier_db::create_pool(&database_url).await?;
    costumier_db::health_check(&pool).await?;
    // Migrations are idempotent; running them here lets a worker start
    // before the API on a fresh database.
    costumier_db::run_migrations(&pool).await?;
    tracing::info!("Database ready");

    let blob_store = Arc::new(HttpObjectStore::new(StorageConfig::from_env()));
    let generation_client = Arc::new(PhotomakerClient::new(PhotomakerConfig::from_env())?);
    let processor = Arc::new(JobProcessor::new(
        Arc::new(PgStatusStore::new(pool.clone())),
        blob_store,
        generation_client,
    ));

    let cancel = tokio_util::sync::CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    tracing::info!("Worker started");
    Dispatcher::new(pool, processor).run(cancel).await;
    tracing::info!("Worker stopped");

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}

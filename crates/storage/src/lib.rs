//! Blob storage for transient per-job uploads.
//!
//! Uploaded source archives live under `jobs/{job_id}/` in an external
//! object store for exactly as long as one job's processing. The store is
//! accessed through the [`BlobStore`] trait so the pipeline can be tested
//! with an in-memory fake.

mod object_store;

pub use object_store::{HttpObjectStore, StorageConfig};

use costumier_core::error::CoreError;

/// Errors from the object storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store returned a non-2xx status code.
    #[error("storage API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

/// An object store holding transient job uploads.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload an object and return its publicly reachable URL.
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;

    /// Delete every object under a key prefix. Used for per-job cleanup
    /// once the job reaches a terminal state.
    async fn delete_prefix(&self, prefix: &str) -> Result<(), StorageError>;
}

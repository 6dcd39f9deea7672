//! REST client for a bucket-based object store.
//!
//! Speaks the storage API used by hosted Postgres platforms:
//! `POST /object/{bucket}/{key}` to upload, `DELETE /object/{bucket}/{key}`
//! to remove, `POST /object/list/{bucket}` to enumerate a prefix, and
//! `/object/public/{bucket}/{key}` as the public download URL.

use serde::Deserialize;

use crate::{BlobStore, StorageError};

/// Object store connection settings.
///
/// Constructed explicitly (usually via [`from_env`](Self::from_env)) and
/// passed into [`HttpObjectStore::new`] -- never a process-global.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the storage API, e.g. `https://xyz.supabase.co/storage/v1`.
    pub base_url: String,
    /// Bucket holding transient job uploads.
    pub bucket: String,
    /// Service key sent as a bearer token.
    pub service_key: String,
}

impl StorageConfig {
    /// Load settings from `STORAGE_URL`, `STORAGE_BUCKET`, and
    /// `STORAGE_SERVICE_KEY`. Panics when a required variable is missing,
    /// which is the desired fail-fast startup behaviour.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("STORAGE_URL").expect("STORAGE_URL must be set"),
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "photomaker".into()),
            service_key: std::env::var("STORAGE_SERVICE_KEY")
                .expect("STORAGE_SERVICE_KEY must be set"),
        }
    }
}

/// HTTP client for the object store.
pub struct HttpObjectStore {
    client: reqwest::Client,
    config: StorageConfig,
}

/// One entry returned by the list endpoint.
#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
}

impl HttpObjectStore {
    /// Create a new store client.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a store client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: StorageConfig) -> Self {
        Self { client, config }
    }

    /// Public download URL for an object key.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/object/public/{}/{key}",
            self.config.base_url, self.config.bucket
        )
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Enumerate object names under a prefix.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let response = self
            .client
            .post(format!(
                "{}/object/list/{}",
                self.config.base_url, self.config.bucket
            ))
            .bearer_auth(&self.config.service_key)
            .json(&serde_json::json!({ "prefix": prefix }))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let entries: Vec<ListedObject> = response.json().await?;
        Ok(entries
            .into_iter()
            .map(|entry| format!("{prefix}/{}", entry.name))
            .collect())
    }

    /// Delete a single object by key.
    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(format!(
                "{}/object/{}/{key}",
                self.config.base_url, self.config.bucket
            ))
            .bearer_auth(&self.config.service_key)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl BlobStore for HttpObjectStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        tracing::debug!(key, content_length = bytes.len(), "Uploading object");

        let response = self
            .client
            .post(format!(
                "{}/object/{}/{key}",
                self.config.base_url, self.config.bucket
            ))
            .bearer_auth(&self.config.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(self.public_url(key))
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), StorageError> {
        let keys = self.list(prefix).await?;
        if keys.is_empty() {
            return Ok(());
        }

        tracing::debug!(prefix, count = keys.len(), "Deleting transient objects");
        futures::future::try_join_all(keys.iter().map(|key| self.delete(key))).await?;
        Ok(())
    }
}

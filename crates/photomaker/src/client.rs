//! HTTP client for the generation service, with typed error
//! classification.

use std::time::Duration;

use costumier_core::error::CoreError;

use crate::messages::{GenerationRequest, GenerationResult};

/// Default request timeout. The hosted model regularly takes tens of
/// seconds per image; five minutes leaves headroom without hanging a
/// worker forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Default API endpoint base.
const DEFAULT_API_URL: &str = "https://fal.run";

/// Model path on the hosted service.
const MODEL_PATH: &str = "fal-ai/photomaker";

/// Connection settings for the generation service.
///
/// Built once at startup (usually via [`from_env`](Self::from_env)) and
/// passed into [`PhotomakerClient::new`] -- never a process-global, so
/// tests can construct clients against fakes.
#[derive(Debug, Clone)]
pub struct PhotomakerConfig {
    /// API base URL, e.g. `https://fal.run`.
    pub base_url: String,
    /// Credential key id (first half of `FAL_KEY`).
    pub key_id: String,
    /// Credential key secret (second half of `FAL_KEY`).
    pub key_secret: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl PhotomakerConfig {
    /// Load settings from the environment.
    ///
    /// `FAL_KEY` holds `key_id:key_secret`; `FAL_API_URL` overrides the
    /// endpoint for self-hosted gateways. Panics on a missing or
    /// malformed key -- misconfiguration should fail at startup, not on
    /// the first job.
    pub fn from_env() -> Self {
        let raw = std::env::var("FAL_KEY").expect("FAL_KEY must be set");
        let (key_id, key_secret) = raw
            .split_once(':')
            .expect("FAL_KEY must have the form key_id:key_secret");

        Self {
            base_url: std::env::var("FAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Errors from the generation service, classified by HTTP status so the
/// orchestrator maps them to user-facing failure classes with a tag
/// check.
#[derive(Debug, thiserror::Error)]
pub enum PhotomakerError {
    /// Credentials were rejected (401/403). Operator issue.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The service could not process the content (422), e.g. no
    /// detectable face in the uploaded photos.
    #[error("input rejected by the service: {0}")]
    Unprocessable(String),

    /// The service considered the request malformed (400).
    #[error("malformed request: {0}")]
    BadRequest(String),

    /// Too many requests (429). Transient; retry later.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The request exceeded the client timeout. Transient.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Any other non-2xx response.
    #[error("service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response that contained no output images.
    #[error("service returned no images")]
    NoOutput,
}

impl From<PhotomakerError> for CoreError {
    fn from(err: PhotomakerError) -> Self {
        match err {
            PhotomakerError::Auth(msg) => CoreError::RemoteAuth(msg),
            PhotomakerError::Unprocessable(msg) => CoreError::RemoteUnprocessable(msg),
            PhotomakerError::BadRequest(msg) => CoreError::RemoteBadRequest(msg),
            PhotomakerError::RateLimited(msg) => CoreError::RemoteRateLimited(msg),
            PhotomakerError::Timeout(timeout) => {
                CoreError::RemoteTimeout(format!("generation call exceeded {timeout:?}"))
            }
            PhotomakerError::Request(e) if e.is_timeout() => {
                CoreError::RemoteTimeout(e.to_string())
            }
            PhotomakerError::Request(e) => CoreError::Internal(e.to_string()),
            PhotomakerError::Api { status, body } => {
                CoreError::Internal(format!("generation service error ({status}): {body}"))
            }
            PhotomakerError::NoOutput => {
                CoreError::Internal("generation service returned no images".to_string())
            }
        }
    }
}

/// A backend that turns a [`GenerationRequest`] into images.
///
/// The production implementation is [`PhotomakerClient`]; tests inject
/// fakes recording invocations.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, PhotomakerError>;
}

/// HTTP client for the hosted PhotoMaker endpoint.
pub struct PhotomakerClient {
    client: reqwest::Client,
    config: PhotomakerConfig,
}

impl PhotomakerClient {
    /// Build a client with the per-request timeout from the config.
    pub fn new(config: PhotomakerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn auth_header(&self) -> String {
        format!("Key {}:{}", self.config.key_id, self.config.key_secret)
    }

    /// Classify a non-success response by status code.
    async fn classify_failure(response: reqwest::Response) -> PhotomakerError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        match status {
            401 | 403 => PhotomakerError::Auth(body),
            422 => PhotomakerError::Unprocessable(body),
            400 => PhotomakerError::BadRequest(body),
            429 => PhotomakerError::RateLimited(body),
            _ => PhotomakerError::Api { status, body },
        }
    }
}

#[async_trait::async_trait]
impl GenerationBackend for PhotomakerClient {
    /// Submit a generation request and block until the service answers.
    ///
    /// No internal retry: transient failures (rate limit, timeout) are
    /// surfaced to the orchestrator.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, PhotomakerError> {
        tracing::info!(
            archive_url = %request.image_archive_url,
            style = %request.style,
            "Submitting generation request",
        );

        let response = self
            .client
            .post(format!("{}/{MODEL_PATH}", self.config.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&request.to_body())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PhotomakerError::Timeout(self.config.request_timeout)
                } else {
                    PhotomakerError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(response).await);
        }

        let result: GenerationResult = response.json().await?;
        if result.images.is_empty() {
            return Err(PhotomakerError::NoOutput);
        }

        tracing::info!(image_count = result.images.len(), "Generation succeeded");
        Ok(result)
    }
}

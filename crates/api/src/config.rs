use costumier_core::encoding::{MAX_IMAGES_PER_JOB, MAX_IMAGE_BYTES};

/// Default request body limit. A full submission is up to
/// [`MAX_IMAGES_PER_JOB`] images of [`MAX_IMAGE_BYTES`] each, inflated
/// ~4/3 by base64, plus JSON framing.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = MAX_IMAGES_PER_JOB * MAX_IMAGE_BYTES * 3 / 2;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). The generation
    /// pipeline itself is not bounded by this -- async jobs run on the
    /// dispatcher, and the sync route raises its own limit.
    pub request_timeout_secs: u64,
    /// Maximum accepted request body size in bytes.
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `BODY_LIMIT_BYTES`     | see [`DEFAULT_BODY_LIMIT_BYTES`] |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let body_limit_bytes: usize = std::env::var("BODY_LIMIT_BYTES")
            .unwrap_or_else(|_| DEFAULT_BODY_LIMIT_BYTES.to_string())
            .parse()
            .expect("BODY_LIMIT_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            body_limit_bytes,
        }
    }
}

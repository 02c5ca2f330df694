//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

use vsum_models::UploadPolicy;

/// Default upload staging directory.
pub const DEFAULT_UPLOAD_DIR: &str = "static/videos";

/// Default language hint sent with indexing tasks.
pub const DEFAULT_INDEX_LANGUAGE: &str = "en";

/// Default interval between task status polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 50;

/// Default upper bound on waiting for indexing, in seconds.
pub const DEFAULT_INDEXING_TIMEOUT_SECS: u64 = 3600;

/// Default maximum request body size (2 GiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 2 * 1024 * 1024 * 1024;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Upload rate limit, requests per second per client IP
    pub rate_limit_rps: u32,
    /// Key the upload limit on `X-Forwarded-For` (only behind a trusted proxy)
    pub trust_proxy_headers: bool,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            trust_proxy_headers: false,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            trust_proxy_headers: std::env::var("TRUST_PROXY_HEADERS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

/// Upload pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory uploaded files are staged in
    pub upload_dir: PathBuf,
    /// Accepted file extensions
    pub upload_policy: UploadPolicy,
    /// Language hint for indexing tasks
    pub language: String,
    /// Interval between task status polls
    pub poll_interval: Duration,
    /// Upper bound on waiting for a task to finish
    pub indexing_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            upload_policy: UploadPolicy::default(),
            language: DEFAULT_INDEX_LANGUAGE.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            indexing_timeout: Duration::from_secs(DEFAULT_INDEXING_TIMEOUT_SECS),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            upload_policy: std::env::var("ALLOWED_EXTENSIONS")
                .map(|s| UploadPolicy::from_list(&s))
                .unwrap_or_default(),
            language: std::env::var("INDEX_LANGUAGE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INDEX_LANGUAGE.to_string()),
            poll_interval: Duration::from_secs(
                std::env::var("POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
            indexing_timeout: Duration::from_secs(
                std::env::var("INDEXING_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_INDEXING_TIMEOUT_SECS),
            ),
        }
    }

    /// Stage uploads in a different directory.
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Override the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the indexing timeout.
    pub fn with_indexing_timeout(mut self, timeout: Duration) -> Self {
        self.indexing_timeout = timeout;
        self
    }
}

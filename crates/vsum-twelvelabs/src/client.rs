//! Twelve Labs REST API client.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};
use vsum_models::{Chapter, GistKind, GistResult, Highlight, VideoId};

use crate::error::{IndexerError, IndexerResult};
use crate::indexer::VideoIndexer;
use crate::metrics::record_request;
use crate::types::{
    ChaptersResponse, CreateIndexRequest, GenerateRequest, GenerateResponse, GistRequest,
    GistResponse, HighlightsResponse, IdResponse, IndexHandle, SummarizeKind, SummarizeRequest,
    SummaryResponse, TaskHandle, TaskResponse, TaskSnapshot,
};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.twelvelabs.io/v1.2";

const API_KEY_HEADER: &str = "x-api-key";

// =============================================================================
// Configuration
// =============================================================================

/// Client configuration.
#[derive(Clone)]
pub struct TwelveLabsConfig {
    /// Vendor API key
    pub api_key: String,
    /// Base URL of the API
    pub base_url: String,
    /// Request timeout (covers video uploads)
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl fmt::Debug for TwelveLabsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwelveLabsConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl TwelveLabsConfig {
    /// Create a config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(600),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create config from environment variables.
    ///
    /// The key is read from `TWELVE_LABS_API_KEY`, falling back to `API_KEY`.
    pub fn from_env() -> IndexerResult<Self> {
        let api_key = std::env::var("TWELVE_LABS_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| {
                IndexerError::config("TWELVE_LABS_API_KEY (or API_KEY) must be set")
            })?;

        if api_key.trim().is_empty() {
            return Err(IndexerError::config("TWELVE_LABS_API_KEY cannot be empty"));
        }

        let timeout_secs: u64 = std::env::var("TWELVE_LABS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(600);

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: std::env::var("TWELVE_LABS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(10),
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// Twelve Labs REST API client.
#[derive(Clone)]
pub struct TwelveLabsClient {
    http: Client,
    base_url: String,
}

impl TwelveLabsClient {
    /// Create a new client.
    pub fn new(config: TwelveLabsConfig) -> IndexerResult<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| IndexerError::config("API key contains invalid header characters"))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .user_agent(concat!("vsum-twelvelabs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IndexerError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> IndexerResult<Self> {
        Self::new(TwelveLabsConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one vendor request inside an `indexer_request` span and decode
    /// the reply.
    async fn send<R>(&self, operation: &'static str, request: RequestBuilder) -> IndexerResult<R>
    where
        R: DeserializeOwned,
    {
        let span = info_span!("indexer_request", operation = operation);
        async {
            let start = Instant::now();
            let result = match request.send().await {
                Ok(response) => decode(response).await,
                Err(e) => Err(IndexerError::from(e)),
            };
            record_outcome(operation, &result, start);
            result
        }
        .instrument(span)
        .await
    }

    async fn post_json<B, R>(&self, operation: &'static str, path: &str, body: &B) -> IndexerResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        self.send(operation, self.http.post(self.url(path)).json(body))
            .await
    }

    async fn get_json<R>(&self, operation: &'static str, path: &str) -> IndexerResult<R>
    where
        R: DeserializeOwned,
    {
        self.send(operation, self.http.get(self.url(path))).await
    }

    async fn summarize<R>(&self, operation: &'static str, video_id: &VideoId, kind: SummarizeKind) -> IndexerResult<R>
    where
        R: DeserializeOwned,
    {
        let request = SummarizeRequest {
            video_id: video_id.as_str(),
            kind,
        };
        self.post_json(operation, "summarize", &request).await
    }
}

/// Turn a vendor response into `R`, classifying error statuses.
async fn decode<R: DeserializeOwned>(response: Response) -> IndexerResult<R> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes);
        return Err(IndexerError::from_http_status(status.as_u16(), &body));
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        IndexerError::invalid_response(format!("unexpected response body: {}", e))
    })
}

/// Content type sent for a staged video, by extension.
pub(crate) fn video_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        Some("mpeg") | Some("mpg") => "video/mpeg",
        Some("ogv") => "video/ogg",
        _ => "application/octet-stream",
    }
}

fn record_outcome<T>(operation: &'static str, result: &IndexerResult<T>, start: Instant) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    record_request(operation, outcome, start.elapsed().as_secs_f64());
}

#[async_trait]
impl VideoIndexer for TwelveLabsClient {
    async fn create_index(&self, name: &str) -> IndexerResult<IndexHandle> {
        let created: IdResponse = self
            .post_json("create_index", "indexes", &CreateIndexRequest::new(name))
            .await?;
        info!(index_id = %created.id, index_name = %name, "Created index");
        Ok(IndexHandle {
            id: created.id,
            name: name.to_string(),
        })
    }

    async fn submit_task(
        &self,
        index: &IndexHandle,
        file_path: &Path,
        language: &str,
    ) -> IndexerResult<TaskHandle> {
        let file = tokio::fs::File::open(file_path).await?;
        let length = file.metadata().await?.len();
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();

        let video = Part::stream_with_length(file, length)
            .file_name(file_name)
            .mime_str(video_mime_type(file_path))?;

        let form = Form::new()
            .text("index_id", index.id.clone())
            .text("language", language.to_string())
            .part("video_file", video);

        debug!(index_id = %index.id, bytes = length, "Uploading video for indexing");

        let created: IdResponse = self
            .send("submit_task", self.http.post(self.url("tasks")).multipart(form))
            .await?;
        info!(task_id = %created.id, index_id = %index.id, "Submitted indexing task");
        Ok(TaskHandle {
            id: created.id,
            index_id: index.id.clone(),
        })
    }

    async fn task_status(&self, task: &TaskHandle) -> IndexerResult<TaskSnapshot> {
        let response: TaskResponse = self
            .get_json("task_status", &format!("tasks/{}", task.id))
            .await?;
        Ok(response.into())
    }

    async fn fetch_gist(&self, video_id: &VideoId, kinds: &[GistKind]) -> IndexerResult<GistResult> {
        let request = GistRequest {
            video_id: video_id.as_str(),
            types: kinds,
        };
        let response: GistResponse = self.post_json("gist", "gist", &request).await?;
        Ok(GistResult {
            title: response.title.unwrap_or_default(),
            topics: response.topics.unwrap_or_default(),
            hashtags: response.hashtags.unwrap_or_default(),
        })
    }

    async fn fetch_summary_text(&self, video_id: &VideoId) -> IndexerResult<String> {
        let response: SummaryResponse = self
            .summarize("summary", video_id, SummarizeKind::Summary)
            .await?;
        Ok(response.summary)
    }

    async fn fetch_chapters(&self, video_id: &VideoId) -> IndexerResult<Vec<Chapter>> {
        let response: ChaptersResponse = self
            .summarize("chapters", video_id, SummarizeKind::Chapter)
            .await?;
        Ok(response.chapters)
    }

    async fn fetch_highlights(&self, video_id: &VideoId) -> IndexerResult<Vec<Highlight>> {
        let response: HighlightsResponse = self
            .summarize("highlights", video_id, SummarizeKind::Highlight)
            .await?;
        Ok(response.highlights)
    }

    async fn generate_free_text(&self, video_id: &VideoId, prompt: &str) -> IndexerResult<String> {
        let request = GenerateRequest {
            video_id: video_id.as_str(),
            prompt,
        };
        let response: GenerateResponse = self.post_json("generate", "generate", &request).await?;
        Ok(response.data)
    }
}

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, Response};
use axum::Router;
use tempfile::TempDir;
use vsum_api::{create_router, ApiConfig, AppState, PipelineConfig, UploadPipeline};
use vsum_models::{Chapter, GistKind, GistResult, Highlight, TaskStatus, VideoId};
use vsum_store::SummaryStore;
use vsum_twelvelabs::{
    IndexHandle, IndexerError, IndexerResult, TaskHandle, TaskSnapshot, VideoIndexer,
};

pub const BOUNDARY: &str = "vsum-test-boundary";

// =============================================================================
// Scripted Indexer
// =============================================================================

/// Vendor operations the scripted indexer can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateIndex,
    SubmitTask,
    TaskStatus,
    Gist,
    Summary,
    Chapters,
    Highlights,
    Keywords,
}

/// In-memory `VideoIndexer` returning fixed fixtures.
pub struct ScriptedIndexer {
    fail_at: Option<Step>,
    connection_lost: bool,
    final_status: TaskStatus,
    video_id: Option<String>,
    pending_polls: AtomicUsize,
    never_finishes: bool,
    calls: Mutex<Vec<Step>>,
    index_names: Mutex<Vec<String>>,
    submitted_files: Mutex<Vec<PathBuf>>,
}

impl ScriptedIndexer {
    /// Every call succeeds and the task becomes ready with `video_id`.
    pub fn ready(video_id: &str) -> Self {
        Self {
            fail_at: None,
            connection_lost: false,
            final_status: TaskStatus::Ready,
            video_id: Some(video_id.to_string()),
            pending_polls: AtomicUsize::new(0),
            never_finishes: false,
            calls: Mutex::new(Vec::new()),
            index_names: Mutex::new(Vec::new()),
            submitted_files: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Fail at `step` as if the vendor became unreachable.
    pub fn losing_connection_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self.connection_lost = true;
        self
    }

    pub fn with_final_status(mut self, status: TaskStatus) -> Self {
        self.final_status = status;
        self
    }

    pub fn with_pending_polls(self, polls: usize) -> Self {
        self.pending_polls.store(polls, Ordering::SeqCst);
        self
    }

    pub fn never_finishing(mut self) -> Self {
        self.never_finishes = true;
        self
    }

    pub fn without_video_id(mut self) -> Self {
        self.video_id = None;
        self
    }

    pub fn calls(&self) -> Vec<Step> {
        self.calls.lock().unwrap().clone()
    }

    pub fn index_names(&self) -> Vec<String> {
        self.index_names.lock().unwrap().clone()
    }

    pub fn submitted_files(&self) -> Vec<PathBuf> {
        self.submitted_files.lock().unwrap().clone()
    }

    fn call(&self, step: Step) -> IndexerResult<()> {
        self.calls.lock().unwrap().push(step);
        if self.fail_at == Some(step) && self.connection_lost {
            return Err(IndexerError::connection(format!(
                "connection reset during {:?}",
                step
            )));
        }
        if self.fail_at == Some(step) {
            return Err(IndexerError::Service {
                status: 500,
                message: format!("scripted failure at {:?}", step),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VideoIndexer for ScriptedIndexer {
    async fn create_index(&self, name: &str) -> IndexerResult<IndexHandle> {
        self.call(Step::CreateIndex)?;
        self.index_names.lock().unwrap().push(name.to_string());
        Ok(IndexHandle {
            id: "idx_1".to_string(),
            name: name.to_string(),
        })
    }

    async fn submit_task(
        &self,
        index: &IndexHandle,
        file_path: &Path,
        _language: &str,
    ) -> IndexerResult<TaskHandle> {
        self.call(Step::SubmitTask)?;
        self.submitted_files
            .lock()
            .unwrap()
            .push(file_path.to_path_buf());
        Ok(TaskHandle {
            id: "task_1".to_string(),
            index_id: index.id.clone(),
        })
    }

    async fn task_status(&self, task: &TaskHandle) -> IndexerResult<TaskSnapshot> {
        self.call(Step::TaskStatus)?;

        let pending = self.never_finishes
            || self
                .pending_polls
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();

        if pending {
            return Ok(TaskSnapshot {
                task_id: task.id.clone(),
                status: TaskStatus::Indexing,
                video_id: None,
            });
        }

        Ok(TaskSnapshot {
            task_id: task.id.clone(),
            status: self.final_status.clone(),
            video_id: self.video_id.as_deref().map(VideoId::from),
        })
    }

    async fn fetch_gist(&self, _video_id: &VideoId, kinds: &[GistKind]) -> IndexerResult<GistResult> {
        self.call(Step::Gist)?;
        assert_eq!(kinds, GistKind::ALL.as_slice());
        Ok(GistResult {
            title: "Live at the Hall".to_string(),
            topics: vec!["music".to_string(), "concert".to_string()],
            hashtags: vec!["#live".to_string(), "#band".to_string()],
        })
    }

    async fn fetch_summary_text(&self, _video_id: &VideoId) -> IndexerResult<String> {
        self.call(Step::Summary)?;
        Ok("A band plays three songs to a packed hall.".to_string())
    }

    async fn fetch_chapters(&self, _video_id: &VideoId) -> IndexerResult<Vec<Chapter>> {
        self.call(Step::Chapters)?;
        Ok(vec![
            Chapter::new(0, 0.0, 95.0, "Opening", "The band walks on stage."),
            Chapter::new(1, 95.0, 3725.0, "Encore", "The crowd calls them back."),
        ])
    }

    async fn fetch_highlights(&self, _video_id: &VideoId) -> IndexerResult<Vec<Highlight>> {
        self.call(Step::Highlights)?;
        Ok(vec![
            Highlight::new(130.0, 142.0, "Guitar solo").with_summary("A long solo.")
        ])
    }

    async fn generate_free_text(&self, _video_id: &VideoId, prompt: &str) -> IndexerResult<String> {
        self.call(Step::Keywords)?;
        assert!(prompt.contains("five keywords"));
        Ok("1. concert\n2. live music\n3. band\n4. encore\n5. guitar".to_string())
    }
}

// =============================================================================
// App Fixtures
// =============================================================================

/// Pipeline config staging into `dir` with near-instant polling.
pub fn pipeline_config(dir: &Path) -> PipelineConfig {
    PipelineConfig::default()
        .with_upload_dir(dir.join("videos"))
        .with_poll_interval(Duration::from_millis(1))
        .with_indexing_timeout(Duration::from_secs(5))
}

pub struct TestPipeline {
    pub pipeline: UploadPipeline,
    pub store: SummaryStore,
    pub dir: TempDir,
}

pub async fn test_pipeline(indexer: Arc<ScriptedIndexer>) -> TestPipeline {
    test_pipeline_with(indexer, |config| config).await
}

pub async fn test_pipeline_with(
    indexer: Arc<ScriptedIndexer>,
    configure: impl FnOnce(PipelineConfig) -> PipelineConfig,
) -> TestPipeline {
    let dir = tempfile::tempdir().unwrap();
    let store = SummaryStore::in_memory().await.unwrap();
    let config = configure(pipeline_config(dir.path()));
    TestPipeline {
        pipeline: UploadPipeline::new(indexer, store.clone(), config),
        store,
        dir,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: SummaryStore,
    pub dir: TempDir,
}

pub async fn test_app(indexer: Arc<ScriptedIndexer>) -> TestApp {
    test_app_with_config(indexer, ApiConfig::default()).await
}

pub async fn test_app_with_config(indexer: Arc<ScriptedIndexer>, config: ApiConfig) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = SummaryStore::in_memory().await.unwrap();
    let state = AppState::new(
        config,
        pipeline_config(dir.path()),
        indexer,
        store.clone(),
    );
    TestApp {
        router: create_router(state, None),
        store,
        dir,
    }
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Build a `POST /upload` with one file part.
pub fn upload_request(field: &str, file_name: &str, contents: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: video/mp4\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Build a `POST /upload` whose body stops partway through the file part.
pub fn truncated_upload_request(file_name: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"video\"; filename=\"{file_name}\"\r\n\
         Content-Type: video/mp4\r\n\r\npartial video bytes"
    );

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Mark a request as arriving from `peer`, as `into_make_service_with_connect_info` does.
pub fn from_peer(mut request: Request<Body>, peer: &str) -> Request<Body> {
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

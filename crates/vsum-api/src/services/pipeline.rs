//! The upload pipeline.
//!
//! Runs one upload from validation to a persisted summary record:
//!
//! ```text
//! Received -> Validated -> Staged -> Indexed -> TaskSubmitted -> Polling
//!          -> Ready | Failed -> Generating -> Persisted -> Done
//! ```
//!
//! Any failure moves the run to `Error`. A record is written only after the
//! task is ready and every generation call has succeeded; nothing is retried.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::Instrument;
use vsum_models::{
    unique_index_name, GistKind, NewSummaryRecord, TaskStatus, UploadError, ValidatedUpload,
    VideoId,
};
use vsum_store::{StoreError, SummaryStore};
use vsum_twelvelabs::{IndexerError, VideoIndexer};

use crate::config::PipelineConfig;
use crate::logging::PipelineLogger;
use crate::metrics;

/// Prompt used to generate SEO keywords.
pub const KEYWORD_PROMPT: &str =
    "Based on this video, I want to generate five keywords for SEO (Search Engine Optimization).";

// =============================================================================
// Stages & Errors
// =============================================================================

/// Stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Validated,
    Staged,
    Indexed,
    TaskSubmitted,
    Polling,
    Ready,
    Failed,
    Generating,
    Persisted,
    Done,
    Error,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Validated => "validated",
            PipelineStage::Staged => "staged",
            PipelineStage::Indexed => "indexed",
            PipelineStage::TaskSubmitted => "task_submitted",
            PipelineStage::Polling => "polling",
            PipelineStage::Ready => "ready",
            PipelineStage::Failed => "failed",
            PipelineStage::Generating => "generating",
            PipelineStage::Persisted => "persisted",
            PipelineStage::Done => "done",
            PipelineStage::Error => "error",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a pipeline run did not produce a record.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(#[from] UploadError),

    #[error("Failed to save uploaded file: {0}")]
    Staging(#[source] std::io::Error),

    #[error("Video indexing service error: {0}")]
    Indexer(#[from] IndexerError),

    #[error("Indexing failed with status {status}")]
    IndexingFailed { status: TaskStatus },

    #[error("Indexing did not finish within {} seconds", .0.as_secs())]
    TimedOut(Duration),

    #[error("Failed to save summary: {0}")]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Staging(_) => "staging",
            PipelineError::Indexer(e) => match e {
                IndexerError::Connection(_) => "indexer_connection",
                IndexerError::Service { .. } => "indexer_service",
                IndexerError::InvalidResponse(_) => "indexer_invalid_response",
                IndexerError::Config(_) => "indexer_config",
                IndexerError::Io(_) => "indexer_io",
            },
            PipelineError::IndexingFailed { .. } => "indexing_failed",
            PipelineError::TimedOut(_) => "timed_out",
            PipelineError::Store(_) => "store",
        }
    }

    /// True when the upload itself was rejected before any side effect.
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub video_id: VideoId,
    pub index_name: String,
    pub video_name: String,
    pub record_id: i64,
}

// =============================================================================
// Upload Bodies
// =============================================================================

/// Bytes of an uploaded file, read chunk by chunk.
///
/// The pipeline only pulls from the body once the file name has been
/// accepted, so rejected uploads are never read.
#[async_trait]
pub trait UploadBody: Send {
    /// The next chunk, or `None` once the body is exhausted.
    async fn next_chunk(&mut self) -> io::Result<Option<Bytes>>;
}

#[async_trait]
impl UploadBody for &[u8] {
    async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        if self.is_empty() {
            return Ok(None);
        }
        Ok(Some(Bytes::copy_from_slice(std::mem::take(self))))
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Orchestrates one upload from validation to a stored summary.
#[derive(Clone)]
pub struct UploadPipeline {
    indexer: Arc<dyn VideoIndexer>,
    store: SummaryStore,
    config: PipelineConfig,
}

impl UploadPipeline {
    pub fn new(indexer: Arc<dyn VideoIndexer>, store: SummaryStore, config: PipelineConfig) -> Self {
        Self {
            indexer,
            store,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline for an upload held in memory.
    ///
    /// `file_name` is `None` when the form carried no file field.
    pub async fn run(
        &self,
        file_name: Option<&str>,
        contents: &[u8],
    ) -> Result<PipelineOutcome, PipelineError> {
        self.run_streaming(file_name, contents).await
    }

    /// Run the pipeline, streaming `body` into the staging directory.
    pub async fn run_streaming<B: UploadBody>(
        &self,
        file_name: Option<&str>,
        body: B,
    ) -> Result<PipelineOutcome, PipelineError> {
        let start = Instant::now();
        let mut logger = PipelineLogger::new(file_name);
        let span = logger.create_span();

        async move {
            metrics::record_upload_started();
            logger.stage(PipelineStage::Received);

            let result = self.execute(&mut logger, file_name, body).await;

            let elapsed = start.elapsed().as_secs_f64();
            match &result {
                Ok(_) => metrics::record_upload_succeeded(elapsed),
                Err(e) => {
                    logger.failure(e);
                    metrics::record_upload_failed(e.kind(), elapsed);
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute<B: UploadBody>(
        &self,
        logger: &mut PipelineLogger,
        file_name: Option<&str>,
        mut body: B,
    ) -> Result<PipelineOutcome, PipelineError> {
        let upload = self.config.upload_policy.validate(file_name)?;
        logger.stage(PipelineStage::Validated);

        let (staged_path, bytes) = self
            .stage_body(&upload, &mut body)
            .await
            .map_err(PipelineError::Staging)?;
        metrics::record_upload_bytes(bytes);
        logger.stage(PipelineStage::Staged);

        let index = self
            .indexer
            .create_index(&unique_index_name(upload.base_name()))
            .await?;
        logger.set_index_name(&index.name);
        logger.stage(PipelineStage::Indexed);

        let task = self
            .indexer
            .submit_task(&index, &staged_path, &self.config.language)
            .await?;
        logger.stage(PipelineStage::TaskSubmitted);

        logger.stage(PipelineStage::Polling);
        let snapshot = tokio::time::timeout(
            self.config.indexing_timeout,
            self.indexer.await_completion(&task, self.config.poll_interval),
        )
        .await
        .map_err(|_| PipelineError::TimedOut(self.config.indexing_timeout))??;

        if !snapshot.status.is_ready() {
            logger.stage(PipelineStage::Failed);
            return Err(PipelineError::IndexingFailed {
                status: snapshot.status,
            });
        }
        let video_id = snapshot.video_id.ok_or_else(|| {
            IndexerError::invalid_response(format!("task {} is ready without a video id", task.id))
        })?;
        logger.stage(PipelineStage::Ready);

        logger.stage(PipelineStage::Generating);
        let gist = self.indexer.fetch_gist(&video_id, &GistKind::ALL).await?;
        let summary = self.indexer.fetch_summary_text(&video_id).await?;
        let chapters = self.indexer.fetch_chapters(&video_id).await?;
        let highlights = self.indexer.fetch_highlights(&video_id).await?;
        let keywords = self
            .indexer
            .generate_free_text(&video_id, KEYWORD_PROMPT)
            .await?;

        let record = NewSummaryRecord::assemble(
            video_id.clone(),
            index.name.clone(),
            upload.file_name(),
            gist,
            summary,
            chapters,
            highlights,
            keywords,
        );
        let record_id = self.store.insert(&record).await?;
        logger.stage(PipelineStage::Persisted);

        logger.stage(PipelineStage::Done);
        Ok(PipelineOutcome {
            video_id,
            index_name: index.name,
            video_name: upload.file_name().to_string(),
            record_id,
        })
    }

    /// Stream the upload into the staging directory, creating it if needed.
    async fn stage_body<B: UploadBody>(
        &self,
        upload: &ValidatedUpload,
        body: &mut B,
    ) -> io::Result<(PathBuf, u64)> {
        tokio::fs::create_dir_all(&self.config.upload_dir).await?;
        let path = self.config.upload_dir.join(upload.file_name());

        let mut file = tokio::fs::File::create(&path).await?;
        let mut written = 0u64;
        while let Some(chunk) = body.next_chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok((path, written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing_failed_message_names_status() {
        let err = PipelineError::IndexingFailed {
            status: TaskStatus::Failed,
        };
        assert_eq!(err.to_string(), "Indexing failed with status failed");
        assert_eq!(err.kind(), "indexing_failed");
    }

    #[test]
    fn test_validation_message_is_user_facing() {
        let err = PipelineError::from(UploadError::InvalidType);
        assert_eq!(err.to_string(), "Invalid file type");
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            PipelineError::from(IndexerError::connection("refused")).kind(),
            "indexer_connection"
        );
        assert_eq!(
            PipelineError::TimedOut(Duration::from_secs(5)).to_string(),
            "Indexing did not finish within 5 seconds"
        );
        assert_eq!(
            PipelineError::from(StoreError::already_exists("vid_1")).kind(),
            "store"
        );
    }

    #[tokio::test]
    async fn test_slice_body_yields_once() {
        let mut body: &[u8] = b"abc";
        assert_eq!(body.next_chunk().await.unwrap(), Some(Bytes::from_static(b"abc")));
        assert_eq!(body.next_chunk().await.unwrap(), None);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::TaskSubmitted.to_string(), "task_submitted");
        assert_eq!(PipelineStage::Done.as_str(), "done");
    }
}

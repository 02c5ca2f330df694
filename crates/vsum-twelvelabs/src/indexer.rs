//! The indexing boundary the upload pipeline depends on.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use vsum_models::{Chapter, GistKind, GistResult, Highlight, VideoId};

use crate::error::IndexerResult;
use crate::types::{IndexHandle, TaskHandle, TaskSnapshot};

/// Operations offered by a video indexing and generation service.
///
/// Implemented by [`crate::TwelveLabsClient`] in production and by scripted
/// fakes in tests.
#[async_trait]
pub trait VideoIndexer: Send + Sync {
    /// Create a new index with the given name.
    async fn create_index(&self, name: &str) -> IndexerResult<IndexHandle>;

    /// Upload a local video file into an index.
    async fn submit_task(
        &self,
        index: &IndexHandle,
        file_path: &Path,
        language: &str,
    ) -> IndexerResult<TaskHandle>;

    /// Read the current state of a task once.
    async fn task_status(&self, task: &TaskHandle) -> IndexerResult<TaskSnapshot>;

    /// Poll a task until it reaches a terminal status.
    ///
    /// Each wait is an async sleep, so dropping the returned future stops
    /// polling. The remote task keeps running.
    async fn await_completion(
        &self,
        task: &TaskHandle,
        poll_interval: Duration,
    ) -> IndexerResult<TaskSnapshot> {
        loop {
            let snapshot = self.task_status(task).await?;
            if snapshot.status.is_terminal() {
                return Ok(snapshot);
            }
            debug!(
                task_id = %task.id,
                status = %snapshot.status,
                "Task not finished, polling again in {:?}",
                poll_interval
            );
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Generate title, topics and/or hashtags.
    async fn fetch_gist(&self, video_id: &VideoId, kinds: &[GistKind]) -> IndexerResult<GistResult>;

    /// Generate a prose summary.
    async fn fetch_summary_text(&self, video_id: &VideoId) -> IndexerResult<String>;

    /// Generate chapters.
    async fn fetch_chapters(&self, video_id: &VideoId) -> IndexerResult<Vec<Chapter>>;

    /// Generate highlights.
    async fn fetch_highlights(&self, video_id: &VideoId) -> IndexerResult<Vec<Highlight>>;

    /// Run an open-ended prompt against the video.
    async fn generate_free_text(&self, video_id: &VideoId, prompt: &str) -> IndexerResult<String>;
}

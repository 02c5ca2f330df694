//! Vendor request/response types.
//!
//! Every operation decodes into an explicit struct here; nothing downstream
//! reads untyped JSON.

use serde::{Deserialize, Serialize};
use vsum_models::{Chapter, GistKind, Highlight, TaskStatus, VideoId};

/// Engine the index is created with.
pub const DEFAULT_ENGINE: &str = "pegasus1";

/// Engine options enabled on new indexes.
pub const DEFAULT_ENGINE_OPTIONS: [&str; 2] = ["visual", "conversation"];

// =============================================================================
// Handles
// =============================================================================

/// A remote index created for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHandle {
    pub id: String,
    pub name: String,
}

/// A remote indexing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub id: String,
    pub index_id: String,
}

/// State of an indexing task at one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub task_id: String,
    pub status: TaskStatus,
    /// Assigned once the vendor has accepted the video
    pub video_id: Option<VideoId>,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct CreateIndexRequest<'a> {
    pub index_name: &'a str,
    pub engines: Vec<EngineSpec<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EngineSpec<'a> {
    pub engine_name: &'a str,
    pub engine_options: Vec<&'a str>,
}

impl<'a> CreateIndexRequest<'a> {
    pub fn new(index_name: &'a str) -> Self {
        Self {
            index_name,
            engines: vec![EngineSpec {
                engine_name: DEFAULT_ENGINE,
                engine_options: DEFAULT_ENGINE_OPTIONS.to_vec(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GistRequest<'a> {
    pub video_id: &'a str,
    pub types: &'a [GistKind],
}

/// Kind of output requested from the summarize endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SummarizeKind {
    Summary,
    Chapter,
    Highlight,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummarizeRequest<'a> {
    pub video_id: &'a str,
    #[serde(rename = "type")]
    pub kind: SummarizeKind,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub video_id: &'a str,
    pub prompt: &'a str,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct IdResponse {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub video_id: Option<String>,
}

impl From<TaskResponse> for TaskSnapshot {
    fn from(r: TaskResponse) -> Self {
        Self {
            task_id: r.id,
            status: r.status,
            video_id: r.video_id.filter(|v| !v.is_empty()).map(VideoId::from),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GistResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub hashtags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChaptersResponse {
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HighlightsResponse {
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    pub data: String,
}

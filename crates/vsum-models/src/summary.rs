//! Summary records and the generated artifacts they hold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::video::VideoId;

/// Artifact kinds requested from the gist endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GistKind {
    Title,
    Topic,
    Hashtag,
}

impl GistKind {
    /// All gist kinds, in the order the pipeline requests them.
    pub const ALL: [GistKind; 3] = [GistKind::Title, GistKind::Topic, GistKind::Hashtag];

    pub fn as_str(&self) -> &'static str {
        match self {
            GistKind::Title => "title",
            GistKind::Topic => "topic",
            GistKind::Hashtag => "hashtag",
        }
    }
}

/// Title, topics and hashtags generated for a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GistResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// A chapter of the video.
///
/// Fields the vendor adds beyond the known ones are kept in `extra` so that
/// a chapter survives storage without losing structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub chapter_number: u32,
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
    #[serde(default)]
    pub chapter_title: String,
    #[serde(default)]
    pub chapter_summary: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Chapter {
    pub fn new(
        chapter_number: u32,
        start: f64,
        end: f64,
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            chapter_number,
            start,
            end,
            chapter_title: title.into(),
            chapter_summary: summary.into(),
            extra: Map::new(),
        }
    }
}

/// A highlighted moment of the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
    #[serde(default)]
    pub highlight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Highlight {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            highlight: text.into(),
            highlight_summary: None,
            extra: Map::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.highlight_summary = Some(summary.into());
        self
    }
}

/// Everything needed to insert a summary record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSummaryRecord {
    pub video_id: VideoId,
    pub index_name: String,
    pub video_name: String,
    pub title: String,
    pub topics: Vec<String>,
    pub hashtags: Vec<String>,
    pub summary: String,
    pub chapters: Vec<Chapter>,
    pub highlights: Vec<Highlight>,
    pub keywords: String,
}

impl NewSummaryRecord {
    /// Assemble a record from the artifacts of one pipeline run.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        video_id: VideoId,
        index_name: impl Into<String>,
        video_name: impl Into<String>,
        gist: GistResult,
        summary: String,
        chapters: Vec<Chapter>,
        highlights: Vec<Highlight>,
        keywords: String,
    ) -> Self {
        Self {
            video_id,
            index_name: index_name.into(),
            video_name: video_name.into(),
            title: gist.title,
            topics: gist.topics,
            hashtags: gist.hashtags,
            summary,
            chapters,
            highlights,
            keywords,
        }
    }
}

/// A persisted summary of one processed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Physical row id
    pub id: i64,
    pub video_id: VideoId,
    pub index_name: String,
    pub video_name: String,
    pub title: String,
    pub topics: Vec<String>,
    pub hashtags: Vec<String>,
    pub summary: String,
    pub chapters: Vec<Chapter>,
    pub highlights: Vec<Highlight>,
    pub keywords: String,
    pub created_at: DateTime<Utc>,
}

/// Row of the history listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub video_id: VideoId,
    pub video_name: String,
}

//! Shared data models for the video summary service.
//!
//! This crate provides Serde-serializable types for:
//! - Summary records and their structured artifacts (chapters, highlights)
//! - Vendor indexing task status
//! - Upload validation and index naming
//! - Time formatting used by the summary views

pub mod naming;
pub mod summary;
pub mod task;
pub mod timefmt;
pub mod upload;
pub mod video;

// Re-export common types
pub use naming::{unique_index_name, unique_index_name_with, INDEX_SUFFIX_LEN};
pub use summary::{Chapter, GistKind, GistResult, Highlight, HistoryEntry, NewSummaryRecord, SummaryRecord};
pub use task::TaskStatus;
pub use timefmt::seconds_to_hhmmss;
pub use upload::{UploadError, UploadPolicy, ValidatedUpload};
pub use video::VideoId;

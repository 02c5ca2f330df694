//! Business logic services.

pub mod history;
pub mod pipeline;

pub use history::HistoryService;
pub use pipeline::{
    PipelineError, PipelineOutcome, PipelineStage, UploadBody, UploadPipeline, KEYWORD_PROMPT,
};

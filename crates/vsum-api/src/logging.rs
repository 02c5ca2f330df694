//! Structured logging for upload pipeline runs.

use tracing::{error, info, warn, Span};

use crate::services::pipeline::{PipelineError, PipelineStage};

/// Logger carrying the context of one pipeline run.
///
/// Every line it emits is tagged with the uploaded file name and, once the
/// remote index exists, the index name.
#[derive(Debug, Clone)]
pub struct PipelineLogger {
    video_name: String,
    index_name: Option<String>,
}

impl PipelineLogger {
    /// Create a logger for an upload. A missing file name is logged as `-`.
    pub fn new(video_name: Option<&str>) -> Self {
        Self {
            video_name: video_name.filter(|n| !n.is_empty()).unwrap_or("-").to_string(),
            index_name: None,
        }
    }

    /// Attach the remote index name to subsequent lines.
    pub fn set_index_name(&mut self, index_name: &str) {
        self.index_name = Some(index_name.to_string());
    }

    /// Log a stage transition.
    pub fn stage(&self, stage: PipelineStage) {
        info!(
            video_name = %self.video_name,
            index_name = self.index_name.as_deref().unwrap_or("-"),
            stage = %stage,
            "Pipeline stage: {}", stage
        );
    }

    /// Log a failed run. Rejected uploads are warnings; everything else is an error.
    pub fn failure(&self, err: &PipelineError) {
        if err.is_validation() {
            warn!(
                video_name = %self.video_name,
                stage = %PipelineStage::Error,
                "Upload rejected: {}", err
            );
        } else {
            error!(
                video_name = %self.video_name,
                index_name = self.index_name.as_deref().unwrap_or("-"),
                stage = %PipelineStage::Error,
                kind = err.kind(),
                "Pipeline failed: {}", err
            );
        }
    }

    pub fn video_name(&self) -> &str {
        &self.video_name
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Create a tracing span for this run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("upload_pipeline", video_name = %self.video_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_context() {
        let mut logger = PipelineLogger::new(Some("song.mp4"));
        assert_eq!(logger.video_name(), "song.mp4");
        assert_eq!(logger.index_name(), None);

        logger.set_index_name("song-a1b2c3d4");
        assert_eq!(logger.index_name(), Some("song-a1b2c3d4"));
    }

    #[test]
    fn test_logger_placeholder_name() {
        assert_eq!(PipelineLogger::new(None).video_name(), "-");
        assert_eq!(PipelineLogger::new(Some("")).video_name(), "-");
    }
}

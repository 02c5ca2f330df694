//! Application state.

use std::sync::Arc;

use vsum_store::SummaryStore;
use vsum_twelvelabs::{TwelveLabsClient, VideoIndexer};

use crate::config::{ApiConfig, PipelineConfig};
use crate::services::{HistoryService, UploadPipeline};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: SummaryStore,
    pub pipeline: Arc<UploadPipeline>,
    pub history: HistoryService,
}

impl AppState {
    /// Assemble state from already constructed services.
    pub fn new(
        config: ApiConfig,
        pipeline_config: PipelineConfig,
        indexer: Arc<dyn VideoIndexer>,
        store: SummaryStore,
    ) -> Self {
        let pipeline = UploadPipeline::new(indexer, store.clone(), pipeline_config);
        let history = HistoryService::new(store.clone());

        Self {
            config,
            store,
            pipeline: Arc::new(pipeline),
            history,
        }
    }

    /// Create state from environment configuration.
    ///
    /// Fails when the vendor API key is missing or the database cannot be
    /// opened and migrated.
    pub async fn from_env(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let indexer = TwelveLabsClient::from_env()?;
        let store = SummaryStore::from_env().await?;

        Ok(Self::new(
            config,
            PipelineConfig::from_env(),
            Arc::new(indexer),
            store,
        ))
    }
}

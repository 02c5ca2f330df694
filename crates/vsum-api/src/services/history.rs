//! Read access to stored summaries.

use vsum_models::{HistoryEntry, SummaryRecord, VideoId};
use vsum_store::{StoreResult, SummaryStore};

/// History and lookup over the summary store.
#[derive(Clone)]
pub struct HistoryService {
    store: SummaryStore,
}

impl HistoryService {
    pub fn new(store: SummaryStore) -> Self {
        Self { store }
    }

    /// Every processed video, in insertion order.
    pub async fn list_entries(&self) -> StoreResult<Vec<HistoryEntry>> {
        self.store.list_entries().await
    }

    /// All records for a video id. Empty when the id is unknown.
    pub async fn find_by_video_id(&self, video_id: &VideoId) -> StoreResult<Vec<SummaryRecord>> {
        self.store.find_by_video_id(video_id).await
    }

    /// The first stored record for a video id, as shown on its summary page.
    pub async fn first_match(&self, video_id: &VideoId) -> StoreResult<Option<SummaryRecord>> {
        Ok(self.find_by_video_id(video_id).await?.into_iter().next())
    }
}

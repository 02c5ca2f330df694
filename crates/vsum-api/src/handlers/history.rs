//! History listing and lookup by video id.

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use vsum_models::VideoId;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::views;

/// Lookup form body.
#[derive(Debug, Deserialize)]
pub struct HistoryLookup {
    #[serde(default)]
    pub video_id: String,
}

/// List every stored summary.
pub async fn history(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let entries = state.history.list_entries().await?;
    Ok(Html(views::history_page(&entries)))
}

/// Show all records for the submitted video id. An unknown id is not an error.
pub async fn lookup_history(
    State(state): State<AppState>,
    Form(lookup): Form<HistoryLookup>,
) -> ApiResult<Html<String>> {
    let video_id = lookup.video_id.trim();
    let records = if video_id.is_empty() {
        Vec::new()
    } else {
        state.history.find_by_video_id(&VideoId::from(video_id)).await?
    };
    Ok(Html(views::history_results_page(video_id, &records)))
}

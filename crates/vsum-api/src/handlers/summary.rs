//! Summary page.

use axum::extract::{Path, State};
use axum::response::Html;
use vsum_models::VideoId;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::views;

/// Render the stored summary for a video id. Unknown ids get the 404 page.
pub async fn summary(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Html<String>> {
    let record = state
        .history
        .first_match(&VideoId::from(video_id.as_str()))
        .await?
        .ok_or(ApiError::NotFound(video_id))?;
    Ok(Html(views::summary_page(&record)))
}

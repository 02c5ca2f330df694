//! Upload form and upload submission.

use std::io;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Query, State};
use axum::response::{Html, Redirect};
use serde::Deserialize;
use tracing::warn;

use crate::services::pipeline::UploadBody;
use crate::state::AppState;
use crate::views;

/// Form field carrying the video file.
pub const VIDEO_FIELD: &str = "video";

/// Query string of the upload form page.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Message from a failed upload
    pub error: Option<String>,
}

/// Upload form.
pub async fn index(Query(query): Query<IndexQuery>) -> Html<String> {
    Html(views::index_page(query.error.as_deref()))
}

#[async_trait]
impl UploadBody for Field<'_> {
    async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        self.chunk().await.map_err(io::Error::other)
    }
}

/// Run the upload pipeline and redirect to the summary or back to the form.
///
/// The `video` field is handed to the pipeline unread; its file name is
/// checked before any of its bytes are pulled from the request.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Redirect {
    let result = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(VIDEO_FIELD) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                break state.pipeline.run_streaming(Some(&file_name), field).await;
            }
            Ok(Some(_)) => continue,
            Ok(None) => break state.pipeline.run(None, &[]).await,
            Err(e) => {
                warn!(error = %e, "Malformed upload form");
                return redirect_with_error(&format!("Could not read upload: {}", e));
            }
        }
    };

    match result {
        Ok(outcome) => Redirect::to(&format!(
            "/summary/{}",
            urlencoding::encode(outcome.video_id.as_str())
        )),
        Err(e) => redirect_with_error(&e.to_string()),
    }
}

/// Redirect to the upload form with a flash message.
pub fn redirect_with_error(message: &str) -> Redirect {
    Redirect::to(&format!("/?error={}", urlencoding::encode(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;

    #[test]
    fn test_redirect_with_error_encodes_message() {
        let response = redirect_with_error("Indexing failed with status failed").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/?error=Indexing%20failed%20with%20status%20failed"
        );
    }
}

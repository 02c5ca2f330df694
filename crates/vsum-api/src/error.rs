//! API error types.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::views;

/// Message shown in place of internal failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No summary for video id {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] vsum_store::StoreError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Full text of an internal error, attached to its response.
///
/// The page itself only shows [`INTERNAL_ERROR_MESSAGE`];
/// [`expose_error_details`] swaps the detail in outside production.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::NotFound(video_id) => {
                (status, Html(views::not_found_page(video_id))).into_response()
            }
            ApiError::Store(_) => {
                error!(error = %self, "Request failed");
                let mut response =
                    (status, Html(views::error_page(status, INTERNAL_ERROR_MESSAGE))).into_response();
                response
                    .extensions_mut()
                    .insert(ErrorDetail(self.to_string()));
                response
            }
        }
    }
}

/// Re-render internal error pages with their detail. Installed only when
/// the server is not running in production.
pub async fn expose_error_details(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;
    let detail = response.extensions().get::<ErrorDetail>().cloned();
    match detail {
        Some(ErrorDetail(detail)) => {
            let status = response.status();
            (status, Html(views::error_page(status, &detail))).into_response()
        }
        None => response,
    }
}

//! Axum web server for uploading videos and browsing their summaries.
//!
//! This crate provides:
//! - The upload pipeline (validate, stage, index, generate, persist)
//! - Server-rendered upload, summary and history pages
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;

pub use config::{ApiConfig, PipelineConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{HistoryService, PipelineError, PipelineOutcome, UploadBody, UploadPipeline};
pub use state::AppState;

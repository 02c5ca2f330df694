//! Twelve Labs video indexing client.
//!
//! This crate provides:
//! - The `VideoIndexer` trait the upload pipeline depends on
//! - `TwelveLabsClient`, the reqwest-backed implementation
//! - Typed request/response structs for each vendor operation
//! - Error classification into connection and service failures

pub mod client;
pub mod error;
pub mod indexer;
pub mod metrics;
pub mod types;


pub use client::{TwelveLabsClient, TwelveLabsConfig};
pub use error::{IndexerError, IndexerResult};
pub use indexer::VideoIndexer;
pub use types::{IndexHandle, TaskHandle, TaskSnapshot};

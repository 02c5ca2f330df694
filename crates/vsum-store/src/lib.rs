//! SQLite persistence for video summary records.
//!
//! One denormalized row per processed video, keyed by the vendor-assigned
//! video id. Structured fields are stored as JSON columns and decoded back
//! into their typed form on read.

pub mod config;
pub mod error;
pub mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use store::SummaryStore;

//! Request handlers.

pub mod health;
pub mod history;
pub mod summary;
pub mod upload;

pub use health::*;
pub use history::*;
pub use summary::*;
pub use upload::*;

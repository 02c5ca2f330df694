//! Indexing task status as reported by the vendor.

use serde::{Deserialize, Serialize};

/// Status of a vendor indexing task.
///
/// Statuses the vendor adds later arrive as `Other` and are treated as
/// terminal, so an unexpected state fails the upload instead of polling
/// forever.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Validating,
    Pending,
    Queued,
    Indexing,
    Ready,
    Failed,
    Other(String),
}

impl TaskStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Validating => "validating",
            TaskStatus::Pending => "pending",
            TaskStatus::Queued => "queued",
            TaskStatus::Indexing => "indexing",
            TaskStatus::Ready => "ready",
            TaskStatus::Failed => "failed",
            TaskStatus::Other(s) => s,
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            TaskStatus::Validating | TaskStatus::Pending | TaskStatus::Queued | TaskStatus::Indexing
        )
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, TaskStatus::Ready)
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "validating" => TaskStatus::Validating,
            "pending" => TaskStatus::Pending,
            "queued" => TaskStatus::Queued,
            "indexing" => TaskStatus::Indexing,
            "ready" => TaskStatus::Ready,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        TaskStatus::from(s.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

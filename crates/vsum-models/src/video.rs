//! Vendor video identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the indexing vendor assigns to a processed video.
///
/// This is the external lookup key for summaries; it is distinct from the
/// store's physical row id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Vendor ids are opaque but never contain path or query characters.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= 128
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_well_formed() {
        assert!(VideoId::from("65f1c0a2e1b2").is_well_formed());
        assert!(VideoId::from("vid_123").is_well_formed());
        assert!(!VideoId::from("").is_well_formed());
        assert!(!VideoId::from("../etc/passwd").is_well_formed());
        assert!(!VideoId::from("a b").is_well_formed());
    }

    #[test]
    fn test_video_id_serializes_transparently() {
        let id = VideoId::from("vid_123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"vid_123\"");
    }
}

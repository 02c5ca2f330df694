//! Upload validation.
//!
//! Checks a submitted file name against a configurable extension allow-list
//! before anything is written to disk or sent to the vendor.

use std::collections::BTreeSet;
use std::path::Path;

use thiserror::Error;

/// Extension accepted when no allow-list is configured.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Reasons an upload is rejected. Each maps to a distinct user message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No video file found")]
    MissingFile,

    #[error("No video file selected")]
    EmptyFilename,

    #[error("Invalid file type")]
    InvalidType,
}

/// Set of accepted file extensions (lowercase, without the dot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed_extensions: BTreeSet<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new([DEFAULT_EXTENSION])
    }
}

impl UploadPolicy {
    /// Create a policy from a list of extensions. Case and leading dots are ignored.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { allowed_extensions }
    }

    /// Parse a comma separated list such as `"mp4,mov"`.
    pub fn from_list(list: &str) -> Self {
        let policy = Self::new(list.split(','));
        if policy.allowed_extensions.is_empty() {
            Self::default()
        } else {
            policy
        }
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed_extensions.iter().map(String::as_str)
    }

    /// True if the name has an extension separator and an allowed extension.
    pub fn is_allowed(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => self.allowed_extensions.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    /// Validate the file name of a submitted upload.
    ///
    /// `None` means the form carried no file field at all.
    pub fn validate(&self, file_name: Option<&str>) -> Result<ValidatedUpload, UploadError> {
        let file_name = file_name.ok_or(UploadError::MissingFile)?;
        if file_name.is_empty() {
            return Err(UploadError::EmptyFilename);
        }

        // Browsers may send a full client path; keep only the last component.
        let file_name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        if !self.is_allowed(&file_name) {
            return Err(UploadError::InvalidType);
        }

        Ok(ValidatedUpload { file_name })
    }
}

/// An upload whose name passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    file_name: String,
}

impl ValidatedUpload {
    /// File name the upload is staged under.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File name with the extension stripped, used to derive the index name.
    pub fn base_name(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(base, _)| base)
            .unwrap_or(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_extension_any_case() {
        let policy = UploadPolicy::default();
        assert!(policy.is_allowed("clip.mp4"));
        assert!(policy.is_allowed("clip.MP4"));
        assert!(policy.is_allowed("my.holiday.Mp4"));
    }

    #[test]
    fn test_rejects_other_or_missing_extension() {
        let policy = UploadPolicy::default();
        assert!(!policy.is_allowed("clip.mov"));
        assert!(!policy.is_allowed("clip"));
        assert!(!policy.is_allowed("mp4"));
        assert!(!policy.is_allowed("clip.mp4.exe"));
        assert!(!policy.is_allowed(""));
    }

    #[test]
    fn test_validate_distinguishes_errors() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.validate(None), Err(UploadError::MissingFile));
        assert_eq!(policy.validate(Some("")), Err(UploadError::EmptyFilename));
        assert_eq!(policy.validate(Some("clip.mov")), Err(UploadError::InvalidType));
        assert_eq!(policy.validate(Some("clip")), Err(UploadError::InvalidType));
    }

    #[test]
    fn test_validated_upload_names() {
        let upload = UploadPolicy::default().validate(Some("song.mp4")).unwrap();
        assert_eq!(upload.file_name(), "song.mp4");
        assert_eq!(upload.base_name(), "song");

        let dotted = UploadPolicy::default().validate(Some("live.at.home.MP4")).unwrap();
        assert_eq!(dotted.base_name(), "live.at.home");
    }

    #[test]
    fn test_validate_strips_directories() {
        let upload = UploadPolicy::default()
            .validate(Some("../../etc/clip.mp4"))
            .unwrap();
        assert_eq!(upload.file_name(), "clip.mp4");
    }

    #[test]
    fn test_configurable_policy() {
        let policy = UploadPolicy::from_list(" MP4, .mov ,");
        assert_eq!(policy.extensions().collect::<Vec<_>>(), vec!["mov", "mp4"]);
        assert!(policy.is_allowed("clip.MOV"));
        assert!(!policy.is_allowed("clip.avi"));

        assert_eq!(UploadPolicy::from_list(""), UploadPolicy::default());
    }
}

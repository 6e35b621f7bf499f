//! Ingest inputs.

use crate::filetypes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file the caller has already spooled to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// The filename as supplied by the client (may include a client path)
    pub filename: String,
    /// Where the upload was spooled
    pub path: PathBuf,
}

impl UploadedFile {
    /// Create an upload handle.
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }
}

/// Exactly one of an uploaded file or a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
pub enum IngestSource {
    /// A local upload
    File(UploadedFile),
    /// A remote URL
    Url(String),
}

impl IngestSource {
    /// The upload, if this is a file source.
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            IngestSource::File(file) => Some(file),
            IngestSource::Url(_) => None,
        }
    }

    /// The URL, if this is a URL source.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            IngestSource::File(_) => None,
            IngestSource::Url(url) => Some(url),
        }
    }

    /// Name used when a parser supplies no display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use medialoom_core::IngestSource;
    ///
    /// let source = IngestSource::Url("http://cdn.example.org/talks/keynote.mp4".into());
    /// assert_eq!(source.default_display_name(), "keynote.mp4");
    /// ```
    pub fn default_display_name(&self) -> String {
        match self {
            IngestSource::File(file) => file.filename.clone(),
            IngestSource::Url(url) => filetypes::basename(url).to_string(),
        }
    }
}

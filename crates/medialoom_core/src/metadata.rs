//! Metadata returned by engine parsers.

use crate::{MediaKind, UploadedFile};
use serde::{Deserialize, Serialize};

/// Where a thumbnail image can be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThumbnailSource {
    /// An image already on disk
    File(UploadedFile),
    /// An image to download
    Url(String),
}

/// Everything an engine managed to learn about a file or URL.
///
/// Only `kind` is mandatory.
///
/// # Examples
///
/// ```
/// use medialoom_core::{FileMetadata, MediaKind};
///
/// let meta = FileMetadata::new(MediaKind::Video)
///     .with_unique_id("dQw4w9WgXcQ")
///     .with_container("youtube")
///     .with_duration(212u32);
/// assert_eq!(meta.unique_id.as_deref(), Some("dQw4w9WgXcQ"));
/// assert_eq!(meta.duration, Some(212));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_", strip_option, into)]
pub struct FileMetadata {
    /// Audio or video
    pub kind: MediaKind,
    /// Backend identifier known at parse time
    pub unique_id: Option<String>,
    /// Container format
    pub container: Option<String>,
    /// Human readable name
    pub display_name: Option<String>,
    /// Title suggestion for the owning media
    pub title: Option<String>,
    /// Size in bytes
    pub size: Option<u64>,
    /// Width in pixels
    pub width: Option<u32>,
    /// Height in pixels
    pub height: Option<u32>,
    /// Bitrate in kbps
    pub bitrate: Option<u32>,
    /// Duration in seconds
    pub duration: Option<u32>,
    /// Thumbnail image
    pub thumbnail: Option<ThumbnailSource>,
}

impl FileMetadata {
    /// Metadata with only the mandatory kind set.
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            unique_id: None,
            container: None,
            display_name: None,
            title: None,
            size: None,
            width: None,
            height: None,
            bitrate: None,
            duration: None,
            thumbnail: None,
        }
    }
}

//! Media, file, podcast and category records.

use crate::filetypes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a media item or file carries audio or video.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    /// Audio only
    Audio,
    /// Video (with or without audio)
    Video,
}

/// Lifecycle state of a [`FileRecord`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileState {
    /// Flushed for its primary key, not yet confirmed by the owning engine
    Pending,
    /// The owning engine has persisted the file
    Stored,
}

/// A category tag attached to media.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Primary key
    pub id: i32,
    /// URL slug
    pub slug: String,
    /// Display name
    pub name: String,
}

/// A podcast. Only used here as a thumbnail owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastRecord {
    /// Primary key, `None` before the podcast is saved
    pub id: Option<i32>,
    /// URL slug
    pub slug: String,
    /// Podcast title
    pub title: String,
}

/// One physical or remote encoding of a media item.
///
/// # Examples
///
/// ```
/// use medialoom_core::{FileRecord, FileState, MediaKind};
///
/// let file = FileRecord::pending(7, 1, MediaKind::Video, "Trailer.mp4").with_container("mp4");
/// assert_eq!(file.state, FileState::Pending);
/// assert!(file.is_playable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_", strip_option, into)]
pub struct FileRecord {
    /// Primary key, assigned when the record is flushed
    pub id: Option<i32>,
    /// Owning media id
    pub media_id: i32,
    /// Owning engine instance id
    pub engine_id: i32,
    /// Backend-assigned identifier
    pub unique_id: Option<String>,
    /// Container format, e.g. `mp4` or `youtube`
    pub container: Option<String>,
    /// Audio or video
    pub kind: MediaKind,
    /// Size in bytes
    pub size: Option<u64>,
    /// Width in pixels
    pub width: Option<u32>,
    /// Height in pixels
    pub height: Option<u32>,
    /// Bitrate in kbps
    pub bitrate: Option<u32>,
    /// Human readable name
    pub display_name: String,
    /// Lifecycle state
    pub state: FileState,
    /// Creation time
    pub created_on: DateTime<Utc>,
    /// Last modification time
    pub modified_on: DateTime<Utc>,
}

impl FileRecord {
    /// A fresh, unflushed record in the `Pending` state.
    pub fn pending(
        media_id: i32,
        engine_id: i32,
        kind: MediaKind,
        display_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            media_id,
            engine_id,
            unique_id: None,
            container: None,
            kind,
            size: None,
            width: None,
            height: None,
            bitrate: None,
            display_name: display_name.into(),
            state: FileState::Pending,
            created_on: now,
            modified_on: now,
        }
    }

    /// True if the container can be played on the web without transcoding.
    pub fn is_playable(&self) -> bool {
        self.container
            .as_deref()
            .is_some_and(filetypes::is_playable_container)
    }
}

/// One publishable audio or video item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Primary key, `None` before the media is saved
    pub id: Option<i32>,
    /// Unique URL slug
    pub slug: String,
    /// Title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Audio or video, inferred from files when unset
    pub kind: Option<MediaKind>,
    /// Duration in seconds
    pub duration: Option<u32>,
    /// Creation time
    pub created_on: DateTime<Utc>,
    /// Last modification time
    pub modified_on: DateTime<Utc>,
    /// Scheduled publish time
    pub publish_on: Option<DateTime<Utc>>,
    /// Passed editorial review
    pub reviewed: bool,
    /// Marked for publication
    pub publishable: bool,
    /// Has at least one web-playable file
    pub encoded: bool,
    /// Attached files
    pub files: Vec<FileRecord>,
    /// Attached categories
    pub categories: Vec<Category>,
}

impl MediaRecord {
    /// A new unreviewed media record with no files.
    pub fn new(id: Option<i32>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            slug: slug.into(),
            title: None,
            description: None,
            kind: None,
            duration: None,
            created_on: now,
            modified_on: now,
            publish_on: None,
            reviewed: false,
            publishable: false,
            encoded: false,
            files: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Recompute `encoded` from the attached files and infer `kind` when unset.
    ///
    /// Video wins over audio when the files disagree.
    pub fn update_status(&mut self) {
        self.encoded = self.files.iter().any(FileRecord::is_playable);
        if self.kind.is_none() {
            self.kind = self.files.iter().map(|f| f.kind).max();
        }
    }

    /// True once the media has passed review and has a usable file.
    pub fn can_publish(&self) -> bool {
        self.reviewed && self.encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_wins_when_inferring_kind() {
        let mut media = MediaRecord::new(Some(1), "talk");
        media
            .files
            .push(FileRecord::pending(1, 1, MediaKind::Audio, "a.mp3").with_container("mp3"));
        media
            .files
            .push(FileRecord::pending(1, 1, MediaKind::Video, "v.avi").with_container("avi"));
        media.update_status();
        assert_eq!(media.kind, Some(MediaKind::Video));
        assert!(media.encoded);
    }
}

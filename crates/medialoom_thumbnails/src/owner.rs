//! Thumbnail owners.

use medialoom_core::{MediaRecord, PodcastRecord};
use std::fmt;

/// Category directory for media thumbnails.
pub const MEDIA_CATEGORY: &str = "media";

/// Category directory for podcast thumbnails.
pub const PODCAST_CATEGORY: &str = "podcasts";

/// Id segment used by unsaved owners and by the placeholder set.
pub const PLACEHOLDER_ID: &str = "new";

/// Whose thumbnails these are: a category directory plus an optional id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThumbnailOwner {
    category: String,
    id: Option<i32>,
}

impl ThumbnailOwner {
    /// Owner in an arbitrary category.
    pub fn new(category: impl Into<String>, id: Option<i32>) -> Self {
        Self {
            category: category.into(),
            id,
        }
    }

    /// A media item.
    pub fn media(id: Option<i32>) -> Self {
        Self::new(MEDIA_CATEGORY, id)
    }

    /// A podcast.
    pub fn podcast(id: Option<i32>) -> Self {
        Self::new(PODCAST_CATEGORY, id)
    }

    /// The placeholder owner of the same category.
    pub fn placeholder(&self) -> Self {
        Self::new(self.category.clone(), None)
    }

    /// Category directory name.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The id used in file names: the numeric id, or `new`.
    pub fn id_segment(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => PLACEHOLDER_ID.to_string(),
        }
    }

    /// True for the placeholder owner.
    pub fn is_placeholder(&self) -> bool {
        self.id.is_none()
    }
}

impl From<&MediaRecord> for ThumbnailOwner {
    fn from(media: &MediaRecord) -> Self {
        Self::media(media.id)
    }
}

impl From<&PodcastRecord> for ThumbnailOwner {
    fn from(podcast: &PodcastRecord) -> Self {
        Self::podcast(podcast.id)
    }
}

impl fmt::Display for ThumbnailOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.id_segment())
    }
}

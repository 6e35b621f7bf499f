//! Settings snapshot handed to each ingest.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Named thumbnail sizes per owner category, e.g. `media.s = (128, 72)`.
pub type ThumbnailSizes = BTreeMap<String, BTreeMap<String, (u32, u32)>>;

/// Thumbnail pipeline settings.
///
/// # Examples
///
/// ```
/// use medialoom_core::ThumbnailSettings;
///
/// let settings = ThumbnailSettings::builder()
///     .image_dir("/srv/medialoom/images")
///     .size("media", "s", (128, 72))
///     .build()
///     .unwrap();
/// assert_eq!(settings.size_of("media", "s"), Some((128, 72)));
/// assert!(!settings.keep_aspect_ratio());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ThumbnailSettings {
    /// Root directory holding `{category}/{id}{size}.jpg`
    image_dir: PathBuf,
    /// Public URL prefix for `image_dir`
    #[builder(default = "\"/images\".to_string()")]
    url_prefix: String,
    /// Recompute target height instead of upscaling small sources
    #[builder(default)]
    #[getter(skip)]
    keep_aspect_ratio: bool,
    /// JPEG quality (1-100)
    #[builder(default = "90")]
    #[getter(skip)]
    jpeg_quality: u8,
    /// Sizes per category
    #[builder(default)]
    sizes: ThumbnailSizes,
}

impl ThumbnailSettingsBuilder {
    /// Add one named size to a category.
    pub fn size(&mut self, category: &str, name: &str, dimensions: (u32, u32)) -> &mut Self {
        self.sizes
            .get_or_insert_with(ThumbnailSizes::new)
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), dimensions);
        self
    }
}

impl ThumbnailSettings {
    /// Creates a new builder.
    pub fn builder() -> ThumbnailSettingsBuilder {
        ThumbnailSettingsBuilder::default()
    }

    /// Whether small sources keep their aspect ratio.
    pub fn keep_aspect_ratio(&self) -> bool {
        self.keep_aspect_ratio
    }

    /// JPEG encoder quality.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Sizes configured for a category.
    pub fn sizes_for(&self, category: &str) -> Option<&BTreeMap<String, (u32, u32)>> {
        self.sizes.get(category)
    }

    /// Dimensions of one named size.
    pub fn size_of(&self, category: &str, name: &str) -> Option<(u32, u32)> {
        self.sizes_for(category)?.get(name).copied()
    }
}

/// Immutable settings snapshot consumed by one ingest call.
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct IngestSettings {
    /// Per-call timeout for outbound HTTP requests
    #[builder(default = "Duration::from_secs(30)")]
    http_timeout: Duration,
    /// Fallback media directory for file engines without a configured path
    media_dir: PathBuf,
    /// Thumbnail settings
    thumbnails: ThumbnailSettings,
}

impl IngestSettings {
    /// Creates a new builder.
    pub fn builder() -> IngestSettingsBuilder {
        IngestSettingsBuilder::default()
    }
}

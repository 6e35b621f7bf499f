//! Configuration loading.
//!
//! Configuration is layered from TOML files (later sources win):
//! - Bundled defaults (include_str! from medialoom.toml)
//! - `~/.config/medialoom/medialoom.toml`
//! - `./medialoom.toml`

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use medialoom_core::{IngestSettings, ThumbnailSettings, ThumbnailSizes};
use medialoom_error::{ConfigError, MedialoomError, MedialoomResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../medialoom.toml");

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Getters)]
pub struct StorageConfig {
    /// Fallback directory for file engines without a configured path
    media_dir: PathBuf,
    /// Timeout for outbound HTTP requests, in seconds
    #[serde(default = "default_http_timeout_secs")]
    http_timeout_secs: u64,
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_url_prefix() -> String {
    "/images".to_string()
}

fn default_jpeg_quality() -> u8 {
    90
}

/// `[thumbnails]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Getters)]
pub struct ThumbnailConfig {
    /// Root directory for thumbnail images
    image_dir: PathBuf,
    /// Public URL prefix for `image_dir`
    #[serde(default = "default_url_prefix")]
    url_prefix: String,
    /// Recompute the target height instead of upscaling small images
    #[serde(default)]
    keep_aspect_ratio: bool,
    /// JPEG encoder quality (1-100)
    #[serde(default = "default_jpeg_quality")]
    jpeg_quality: u8,
    /// Named sizes per owner category
    #[serde(default)]
    sizes: ThumbnailSizes,
}

/// Top-level Medialoom configuration.
///
/// # Example
///
/// ```no_run
/// use medialoom::MedialoomConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MedialoomConfig::load()?;
/// let settings = config.ingest_settings()?;
/// println!("Media dir: {}", settings.media_dir().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Getters)]
pub struct MedialoomConfig {
    /// Storage settings
    storage: StorageConfig,
    /// Thumbnail settings
    thumbnails: ThumbnailConfig,
}

impl MedialoomConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MedialoomResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                MedialoomError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MedialoomError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// The bundled defaults alone, ignoring user files.
    pub fn bundled() -> MedialoomResult<Self> {
        Self::deserialize_from(
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)),
        )
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> MedialoomResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/medialoom/medialoom.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("medialoom").required(false));

        Self::deserialize_from(builder)
    }

    fn deserialize_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> MedialoomResult<Self> {
        builder
            .build()
            .map_err(|e| {
                MedialoomError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MedialoomError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Thumbnail settings for the pipeline.
    pub fn thumbnail_settings(&self) -> MedialoomResult<ThumbnailSettings> {
        let thumbs = &self.thumbnails;
        if !(1..=100).contains(&thumbs.jpeg_quality) {
            return Err(ConfigError::new(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                thumbs.jpeg_quality
            ))
            .into());
        }
        ThumbnailSettings::builder()
            .image_dir(thumbs.image_dir.clone())
            .url_prefix(thumbs.url_prefix.clone())
            .keep_aspect_ratio(thumbs.keep_aspect_ratio)
            .jpeg_quality(thumbs.jpeg_quality)
            .sizes(thumbs.sizes.clone())
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid [thumbnails] section: {}", e)).into())
    }

    /// The immutable settings snapshot handed to each ingest.
    ///
    /// # Errors
    ///
    /// Returns an error if a section holds out-of-range values.
    pub fn ingest_settings(&self) -> MedialoomResult<IngestSettings> {
        IngestSettings::builder()
            .http_timeout(Duration::from_secs(self.storage.http_timeout_secs))
            .media_dir(self.storage.media_dir.clone())
            .thumbnails(self.thumbnail_settings()?)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid [storage] section: {}", e)).into())
    }
}

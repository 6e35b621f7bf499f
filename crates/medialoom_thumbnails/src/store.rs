//! On-disk thumbnail sets.

use crate::{ThumbnailOwner, resize_thumb};
use image::codecs::jpeg::JpegEncoder;
use medialoom_core::{ThumbnailSettings, filetypes};
use medialoom_error::{MedialoomResult, ThumbnailError, ThumbnailErrorKind};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Size probed by [`ThumbnailStore::has_thumbs`] and
/// [`ThumbnailStore::has_default_thumbs`].
pub const PROBE_SIZE: &str = "s";

/// URL and configured dimensions of one thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Thumb {
    /// Public URL
    url: String,
    /// Configured width
    width: u32,
    /// Configured height
    height: u32,
}

/// Thumbnail sets on the local filesystem.
///
/// All operations are blocking; async callers should run them on the
/// blocking pool.
#[derive(Debug, Clone)]
pub struct ThumbnailStore {
    settings: ThumbnailSettings,
}

impl ThumbnailStore {
    /// Create a store over the configured image directory.
    pub fn new(settings: ThumbnailSettings) -> Self {
        Self { settings }
    }

    /// The settings this store was built with.
    pub fn settings(&self) -> &ThumbnailSettings {
        &self.settings
    }

    fn sizes(&self, owner: &ThumbnailOwner) -> MedialoomResult<&BTreeMap<String, (u32, u32)>> {
        self.settings.sizes_for(owner.category()).ok_or_else(|| {
            ThumbnailError::new(ThumbnailErrorKind::UnknownCategory(
                owner.category().to_string(),
            ))
            .into()
        })
    }

    fn file_name(owner: &ThumbnailOwner, size: &str, ext: &str) -> String {
        if ext.is_empty() {
            format!("{}{}", owner.id_segment(), size)
        } else {
            format!("{}{}.{}", owner.id_segment(), size, ext)
        }
    }

    fn category_dir(&self, owner: &ThumbnailOwner) -> PathBuf {
        self.settings.image_dir().join(owner.category())
    }

    /// Path of the JPEG thumbnail for one size, whether or not it exists.
    pub fn path(&self, owner: &ThumbnailOwner, size: &str) -> PathBuf {
        self.category_dir(owner)
            .join(Self::file_name(owner, size, "jpg"))
    }

    /// Path of the thumbnail for one size, only if the file exists.
    pub fn existing_path(&self, owner: &ThumbnailOwner, size: &str) -> Option<PathBuf> {
        let path = self.path(owner, size);
        path.is_file().then_some(path)
    }

    /// Paths for every configured size of the owner's category.
    pub fn paths(&self, owner: &ThumbnailOwner) -> MedialoomResult<BTreeMap<String, PathBuf>> {
        Ok(self
            .sizes(owner)?
            .keys()
            .map(|size| (size.clone(), self.path(owner, size)))
            .collect())
    }

    /// Public URL of one thumbnail.
    ///
    /// With `exists` set, returns `None` when the file is missing.
    pub fn url(&self, owner: &ThumbnailOwner, size: &str, exists: bool) -> Option<String> {
        if exists && !self.path(owner, size).is_file() {
            return None;
        }
        Some(format!(
            "{}/{}/{}",
            self.settings.url_prefix().trim_end_matches('/'),
            owner.category(),
            Self::file_name(owner, size, "jpg")
        ))
    }

    /// URL plus configured dimensions of one thumbnail.
    pub fn thumb(&self, owner: &ThumbnailOwner, size: &str, exists: bool) -> Option<Thumb> {
        let (width, height) = self.settings.size_of(owner.category(), size)?;
        let url = self.url(owner, size, exists)?;
        Some(Thumb { url, width, height })
    }

    /// Generate every configured size from an uploaded image and keep a
    /// verbatim backup of the original.
    ///
    /// # Arguments
    ///
    /// * `owner` - Who the thumbnails belong to
    /// * `bytes` - The encoded source image
    /// * `filename` - The original filename, used for the backup extension
    #[tracing::instrument(skip(self, owner, bytes), fields(owner = %owner, size = bytes.len()))]
    pub fn create(&self, owner: &ThumbnailOwner, bytes: &[u8], filename: &str) -> MedialoomResult<()> {
        let sizes = self.sizes(owner)?;
        let source = image::load_from_memory(bytes)
            .map_err(|e| ThumbnailError::new(ThumbnailErrorKind::Decode(e.to_string())))?;

        let dir = self.category_dir(owner);
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

        for (size, dimensions) in sizes {
            let resized = resize_thumb(&source, *dimensions, self.settings.keep_aspect_ratio());
            let rgb = resized.to_rgb8();
            let path = self.path(owner, size);
            let file = fs::File::create(&path).map_err(|e| io_error(&path, e))?;
            let mut writer = BufWriter::new(file);
            JpegEncoder::new_with_quality(&mut writer, self.settings.jpeg_quality())
                .encode(rgb.as_raw(), rgb.width(), rgb.height(), image::ColorType::Rgb8.into())
                .map_err(|e| {
                    ThumbnailError::new(ThumbnailErrorKind::Encode(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                })?;
            writer.flush().map_err(|e| io_error(&path, e))?;
            tracing::debug!(size = %size, path = %path.display(), "Wrote thumbnail");
        }

        let (_, ext) = filetypes::split_extension(filename);
        let backup = dir.join(Self::file_name(owner, "orig", &ext));
        fs::write(&backup, bytes).map_err(|e| io_error(&backup, e))?;

        tracing::info!(sizes = sizes.len(), "Created thumbnails");
        Ok(())
    }

    /// Copy the placeholder set (id `new`) to the owner.
    ///
    /// Running this twice leaves the same files behind.
    #[tracing::instrument(skip(self, owner), fields(owner = %owner))]
    pub fn create_defaults(&self, owner: &ThumbnailOwner) -> MedialoomResult<()> {
        let placeholder = owner.placeholder();
        let dir = self.category_dir(owner);
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

        for size in self.sizes(owner)?.keys() {
            let src = self.path(&placeholder, size);
            if !src.is_file() {
                return Err(ThumbnailError::new(ThumbnailErrorKind::MissingPlaceholder(
                    src.display().to_string(),
                ))
                .into());
            }
            let dst = self.path(owner, size);
            if src != dst {
                fs::copy(&src, &dst).map_err(|e| io_error(&dst, e))?;
            }
        }
        tracing::debug!("Copied placeholder thumbnails");
        Ok(())
    }

    /// True if the owner has a thumbnail at the probe size.
    pub fn has_thumbs(&self, owner: &ThumbnailOwner) -> bool {
        self.existing_path(owner, PROBE_SIZE).is_some()
    }

    /// True if the owner's probe-size thumbnail is byte-identical to the
    /// placeholder.
    ///
    /// A custom thumbnail that happens to match the placeholder counts as a
    /// default. Missing files on either side compare as not default.
    pub fn has_default_thumbs(&self, owner: &ThumbnailOwner) -> bool {
        let ours = fs::read(self.path(owner, PROBE_SIZE));
        let theirs = fs::read(self.path(&owner.placeholder(), PROBE_SIZE));
        match (ours, theirs) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// Remove every thumbnail and the original backup of an owner.
    ///
    /// Missing files are ignored. The placeholder set is never deleted.
    #[tracing::instrument(skip(self, owner), fields(owner = %owner))]
    pub fn delete(&self, owner: &ThumbnailOwner) -> MedialoomResult<()> {
        if owner.is_placeholder() {
            tracing::warn!("Refusing to delete placeholder thumbnails");
            return Ok(());
        }
        for path in self.paths(owner)?.values() {
            remove_if_present(path)?;
        }

        let dir = self.category_dir(owner);
        let backup_prefix = Self::file_name(owner, "orig", "");
        if let Ok(entries) = fs::read_dir(&dir) {
            for entry in entries.flatten() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                let is_backup = name == backup_prefix
                    || name
                        .strip_prefix(backup_prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('.'));
                if is_backup {
                    remove_if_present(&entry.path())?;
                }
            }
        }
        tracing::info!("Deleted thumbnails");
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> MedialoomResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(path, e)),
    }
}

fn io_error(path: &Path, e: std::io::Error) -> medialoom_error::MedialoomError {
    ThumbnailError::new(ThumbnailErrorKind::Io(format!("{}: {}", path.display(), e))).into()
}

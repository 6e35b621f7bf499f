//! Local filesystem engines.

use super::file::{FileEngineSettings, copy_upload, parse_upload, remove_stored};
use super::FILE_FAMILY;
use crate::{EngineDescriptor, StorageEngine, safe_file_name};
use async_trait::async_trait;
use medialoom_core::{
    EngineInstance, FileMetadata, FileRecord, IngestSource, MediaRecord, StorageUri,
};
use medialoom_error::{MedialoomResult, StorageError, StorageErrorKind, UnsuitableEngineError};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How stored files are laid out under the storage root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalLayout {
    /// `{root}/{name}`
    Flat,
    /// `{root}/{media slug}/{name}`, unique id `{slug}/{name}`
    PerMedia,
}

/// Stores uploads on the local filesystem.
///
/// # Example Structure
///
/// ```text
/// /srv/medialoom/media/
/// ├── 12-keynote.mp4              (Flat)
/// └── opening-night/
///     └── 13-interview.m4a        (PerMedia)
/// ```
#[derive(Debug)]
pub struct LocalFileStorage {
    instance: EngineInstance,
    layout: LocalLayout,
    root: PathBuf,
    settings: FileEngineSettings,
}

impl LocalFileStorage {
    /// Create an engine rooted at `root`.
    pub fn new(
        instance: EngineInstance,
        layout: LocalLayout,
        root: impl Into<PathBuf>,
        settings: FileEngineSettings,
    ) -> Self {
        Self {
            instance,
            layout,
            root: root.into(),
            settings,
        }
    }

    /// Storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path of a stored file.
    pub fn path_for(&self, file: &FileRecord) -> Option<PathBuf> {
        let unique_id = file.unique_id.as_deref()?;
        Some(self.root.join(unique_id))
    }

    fn unique_id_for(&self, media: &MediaRecord, name: String) -> MedialoomResult<String> {
        match self.layout {
            LocalLayout::Flat => Ok(name),
            LocalLayout::PerMedia => {
                let slug = media.slug.trim_matches('/');
                if slug.is_empty() || slug.contains(['/', '\\']) || slug == ".." {
                    return Err(StorageError::new(StorageErrorKind::InvalidPath(format!(
                        "unusable media slug '{}'",
                        media.slug
                    )))
                    .into());
                }
                Ok(format!("{}/{}", slug, name))
            }
        }
    }
}

#[async_trait]
impl StorageEngine for LocalFileStorage {
    fn instance(&self) -> &EngineInstance {
        &self.instance
    }

    async fn parse(&self, source: &IngestSource) -> MedialoomResult<FileMetadata> {
        parse_upload(source).await
    }

    #[tracing::instrument(skip_all, fields(engine_type = self.engine_type(), file_id = ?file.id))]
    async fn store(
        &self,
        media: &MediaRecord,
        file: &FileRecord,
        source: &IngestSource,
        _meta: &FileMetadata,
    ) -> MedialoomResult<Option<String>> {
        let upload = source
            .as_file()
            .ok_or_else(|| UnsuitableEngineError::new("file engines only store uploads"))?;
        let name = safe_file_name(file, Some(&upload.filename))?;
        let unique_id = self.unique_id_for(media, name)?;
        let destination = self.root.join(&unique_id);

        copy_upload(&upload.path, &destination).await?;
        tracing::info!(path = %destination.display(), "Stored upload");
        Ok(Some(unique_id))
    }

    #[tracing::instrument(skip_all, fields(engine_type = self.engine_type(), file_id = ?file.id))]
    async fn delete(&self, file: &FileRecord) -> MedialoomResult<()> {
        let Some(path) = self.path_for(file) else {
            return Ok(());
        };
        remove_stored(&path).await?;

        if self.layout == LocalLayout::PerMedia
            && let Some(folder) = path.parent()
            && folder != self.root
        {
            // Only succeeds once the folder is empty
            let _ = tokio::fs::remove_dir(folder).await;
        }
        tracing::info!(path = %path.display(), "Deleted stored file");
        Ok(())
    }

    fn get_uris(&self, file: &Arc<FileRecord>) -> Vec<StorageUri> {
        let Some(unique_id) = file.unique_id.as_deref() else {
            return Vec::new();
        };
        let mut uris = Vec::new();

        let path = self.root.join(unique_id);
        if let Ok(absolute) = std::path::absolute(&path)
            && let Ok(url) = url::Url::from_file_path(&absolute)
        {
            uris.push(StorageUri::new(file.clone(), "file", url.to_string()));
        }
        if let Some(base_url) = &self.settings.base_url {
            uris.push(StorageUri::new(
                file.clone(),
                "http",
                format!("{}/{}", base_url.trim_end_matches('/'), unique_id),
            ));
        }
        if let Some(server) = &self.settings.rtmp_server_uri {
            uris.push(StorageUri::new(file.clone(), "rtmp", unique_id).with_server_uri(server));
        }
        uris
    }
}

fn build(
    instance: EngineInstance,
    ctx: &crate::EngineContext,
    layout: LocalLayout,
) -> MedialoomResult<Arc<dyn StorageEngine>> {
    let settings = FileEngineSettings::from_data(instance.engine_type(), instance.data())?;
    let root = settings
        .path
        .clone()
        .unwrap_or_else(|| ctx.media_dir().clone());
    Ok(Arc::new(LocalFileStorage::new(instance, layout, root, settings)))
}

/// Descriptor for `local_files`: uploads copied into one directory.
pub fn local_files() -> EngineDescriptor {
    EngineDescriptor::new("local_files", "Local File Storage", |instance, ctx| {
        build(instance, ctx, LocalLayout::Flat)
    })
    .family(FILE_FAMILY)
    .default_data(json!({"path": null, "base_url": null, "rtmp_server_uri": null}))
}

/// Descriptor for `media_folders`: uploads grouped in one folder per media slug.
pub fn media_folders() -> EngineDescriptor {
    EngineDescriptor::new("media_folders", "Media Folder Storage", |instance, ctx| {
        build(instance, ctx, LocalLayout::PerMedia)
    })
    .family(FILE_FAMILY)
    .try_before("local_files")
    .default_data(json!({"path": null, "base_url": null, "rtmp_server_uri": null}))
}

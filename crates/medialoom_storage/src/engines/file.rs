//! Shared behaviour of engines that accept uploads.

use medialoom_core::{FileMetadata, IngestSource, filetypes};
use medialoom_error::{
    EngineError, EngineErrorKind, MedialoomResult, StorageError, StorageErrorKind,
    UnsuitableEngineError,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Instance data shared by the local file engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEngineSettings {
    /// Storage root, defaults to the configured media directory
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Public URL the storage root is served under
    #[serde(default)]
    pub base_url: Option<String>,
    /// RTMP server streaming the storage root
    #[serde(default)]
    pub rtmp_server_uri: Option<String>,
}

impl FileEngineSettings {
    /// Read settings from an instance's data object.
    pub fn from_data(engine_type: &str, data: &serde_json::Value) -> MedialoomResult<Self> {
        serde_json::from_value(data.clone()).map_err(|e| {
            EngineError::new(EngineErrorKind::InvalidSettings {
                engine: engine_type.to_string(),
                reason: e.to_string(),
            })
            .into()
        })
    }
}

/// Sniff an upload's container, type, display name and size.
///
/// URL sources are declined.
pub async fn parse_upload(source: &IngestSource) -> MedialoomResult<FileMetadata> {
    let upload = source
        .as_file()
        .ok_or_else(|| UnsuitableEngineError::new("file engines only accept uploads"))?;

    let (name, ext) = filetypes::split_extension(&upload.filename);
    let container = filetypes::guess_container_format(&ext);
    let suffix = container.unwrap_or(ext.as_str());
    let display_name = if suffix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", name, suffix)
    };

    let size = tokio::fs::metadata(&upload.path)
        .await
        .map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                upload.path.display(),
                e
            )))
        })?
        .len();

    let mut meta = FileMetadata::new(filetypes::guess_media_type(container))
        .with_display_name(display_name)
        .with_size(size);
    if let Some(container) = container {
        meta = meta.with_container(container);
    }
    Ok(meta)
}

/// Copy an upload to its final location, creating parent directories.
pub(crate) async fn copy_upload(from: &Path, to: &Path) -> MedialoomResult<()> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }
    tokio::fs::copy(from, to).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "copy {} to {}: {}",
            from.display(),
            to.display(),
            e
        )))
    })?;
    Ok(())
}

/// Remove a stored file. A file that is already gone counts as removed.
pub(crate) async fn remove_stored(path: &Path) -> MedialoomResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Stored file already gone");
            Ok(())
        }
        Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
            "remove {}: {}",
            path.display(),
            e
        )))
        .into()),
    }
}

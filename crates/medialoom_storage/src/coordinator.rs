//! The ingest flow.

use crate::{EngineContext, EngineRegistry, StorageEngine, sort_engines};
use medialoom_core::{
    FileMetadata, FileRecord, FileState, IngestSettings, IngestSource, MediaRecord, StorageUri,
    ThumbnailSource, filetypes,
};
use medialoom_error::{
    MedialoomResult, StorageError, StorageErrorKind, ThumbnailError, ThumbnailErrorKind,
};
use medialoom_interface::{MediaRepository, RepositoryTransaction};
use medialoom_thumbnails::{ThumbnailOwner, ThumbnailStore};
use std::collections::HashMap;
use std::sync::Arc;

/// Drives uploads and URLs through the engine pipeline.
///
/// The coordinator holds no mutable state. Every call reads the engine
/// instances fresh from the repository and works from the settings
/// snapshot it is handed.
#[derive(Clone)]
pub struct StorageCoordinator {
    registry: Arc<EngineRegistry>,
    repository: Arc<dyn MediaRepository>,
    http: reqwest::Client,
}

impl std::fmt::Debug for StorageCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageCoordinator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl StorageCoordinator {
    /// Create a coordinator with a default HTTP client.
    pub fn new(registry: Arc<EngineRegistry>, repository: Arc<dyn MediaRepository>) -> Self {
        Self {
            registry,
            repository,
            http: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured HTTP client for engines and thumbnail downloads.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// The engine registry.
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Engine context for a settings snapshot, sharing this coordinator's HTTP client.
    pub fn context(&self, settings: &IngestSettings) -> EngineContext {
        EngineContext::new(self.http.clone(), settings)
    }

    /// Enabled engines in parse order.
    ///
    /// # Errors
    ///
    /// Fails with `CircularDependency` if the enabled types cannot be ordered.
    pub async fn sorted_engines(
        &self,
        settings: &IngestSettings,
    ) -> MedialoomResult<Vec<Arc<dyn StorageEngine>>> {
        let instances = self.repository.list_engines(true).await?;
        let engines = self
            .registry
            .instantiate(&instances, &self.context(settings))?;
        sort_engines(&self.registry, engines)
    }

    /// Every configured engine keyed by instance id, disabled ones included.
    async fn engines_by_id(
        &self,
        settings: &IngestSettings,
    ) -> MedialoomResult<HashMap<i32, Arc<dyn StorageEngine>>> {
        let instances = self.repository.list_engines(false).await?;
        let engines = self
            .registry
            .instantiate_all(&instances, &self.context(settings))?;
        Ok(engines.into_iter().map(|e| (e.id(), e)).collect())
    }

    /// Store an upload or URL as a new file of `media`.
    ///
    /// The first engine (in sorted order) whose parser accepts the source
    /// stores it. Flushing the file row, storing, and updating the media
    /// happen in one transaction; on failure it is rolled back, `media`
    /// is left untouched and any data the engine already wrote is deleted
    /// best effort. Thumbnail generation and transcoding follow the
    /// commit and never fail the ingest.
    ///
    /// # Errors
    ///
    /// - `UnsavedMedia` if `media` has no id
    /// - `NoUsableEngine` if every engine declines the source
    /// - `MissingUniqueId` if the engine stored the file without an id
    /// - any parse, store or repository error
    #[tracing::instrument(skip_all, fields(media_id = ?media.id))]
    pub async fn ingest(
        &self,
        media: &mut MediaRecord,
        source: &IngestSource,
        settings: &IngestSettings,
    ) -> MedialoomResult<FileRecord> {
        let media_id = media
            .id
            .ok_or_else(|| StorageError::new(StorageErrorKind::UnsavedMedia))?;
        let engines = self.sorted_engines(settings).await?;
        let (engine, meta) = select_engine(&engines, source).await?;

        let mut file = pending_file(media_id, engine.as_ref(), &meta, source);
        let mut staged = media.clone();
        let mut tx = self.repository.begin().await?;
        let outcome =
            store_file(tx.as_mut(), engine.as_ref(), &mut staged, &mut file, source, &meta).await;
        let committed = match outcome {
            Ok(()) => tx.commit().await,
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        };
        if let Err(e) = committed {
            tracing::warn!(engine_type = engine.engine_type(), error = %e, "Ingest rolled back");
            if file.state == FileState::Stored {
                discard_stored(engine.as_ref(), &file).await;
            }
            return Err(e);
        }
        *media = staged;
        tracing::info!(
            file_id = ?file.id,
            engine_type = engine.engine_type(),
            unique_id = ?file.unique_id,
            "Stored file"
        );

        if let Some(thumbnail) = meta.thumbnail.clone()
            && let Err(e) = self.attach_thumbnail(media, thumbnail, settings).await
        {
            tracing::warn!(error = %e, "Skipping thumbnail");
        }

        offer_transcode(&engines, &file).await;
        Ok(file)
    }

    /// Replace default thumbnails of `media` with the given image.
    ///
    /// Custom thumbnails are kept.
    async fn attach_thumbnail(
        &self,
        media: &MediaRecord,
        thumbnail: ThumbnailSource,
        settings: &IngestSettings,
    ) -> MedialoomResult<()> {
        let owner = ThumbnailOwner::from(media);
        let store = ThumbnailStore::new(settings.thumbnails().clone());

        let replaceable = {
            let (store, owner) = (store.clone(), owner.clone());
            run_blocking(move || {
                Ok(!store.has_thumbs(&owner) || store.has_default_thumbs(&owner))
            })
            .await?
        };
        if !replaceable {
            tracing::debug!(owner = %owner, "Keeping custom thumbnails");
            return Ok(());
        }

        let (bytes, filename) = match thumbnail {
            ThumbnailSource::File(upload) => {
                let bytes = tokio::fs::read(&upload.path).await.map_err(|e| {
                    ThumbnailError::new(ThumbnailErrorKind::Io(format!(
                        "{}: {}",
                        upload.path.display(),
                        e
                    )))
                })?;
                (bytes, upload.filename)
            }
            ThumbnailSource::Url(url) => {
                let bytes = self.fetch(&url, settings).await?;
                (bytes, filetypes::basename(&url).to_string())
            }
        };

        run_blocking(move || store.create(&owner, &bytes, &filename)).await?;
        tracing::info!(media_id = ?media.id, "Created thumbnails");
        Ok(())
    }

    async fn fetch(&self, url: &str, settings: &IngestSettings) -> MedialoomResult<Vec<u8>> {
        let fetch_error = |e: reqwest::Error| {
            ThumbnailError::new(ThumbnailErrorKind::Fetch(format!("{}: {}", url, e)))
        };
        let response = self
            .http
            .get(url)
            .timeout(*settings.http_timeout())
            .send()
            .await
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?;
        Ok(response.bytes().await.map_err(fetch_error)?.to_vec())
    }

    /// Delete a file row and, best effort, its physical data.
    ///
    /// The owning media's status is recomputed afterwards. Returns `None`
    /// if the file did not exist.
    #[tracing::instrument(skip(self, settings))]
    pub async fn remove_file(
        &self,
        file_id: i32,
        settings: &IngestSettings,
    ) -> MedialoomResult<Option<FileRecord>> {
        let Some(file) = self.repository.delete_file(file_id).await? else {
            return Ok(None);
        };
        self.delete_physical(std::slice::from_ref(&file), settings).await;

        let mut media = self.repository.load_media(file.media_id).await?;
        media.update_status();
        let mut tx = self.repository.begin().await?;
        tx.update_media(&media).await?;
        tx.commit().await?;

        tracing::info!(media_id = file.media_id, "Removed file");
        Ok(Some(file))
    }

    /// Delete a media row, its files and thumbnails.
    ///
    /// Physical deletes and thumbnail removal are best effort. Returns
    /// `None` if the media did not exist.
    #[tracing::instrument(skip(self, settings))]
    pub async fn delete_media(
        &self,
        media_id: i32,
        settings: &IngestSettings,
    ) -> MedialoomResult<Option<MediaRecord>> {
        let Some(media) = self.repository.delete_media(media_id).await? else {
            return Ok(None);
        };
        self.delete_physical(&media.files, settings).await;

        let owner = ThumbnailOwner::from(&media);
        let store = ThumbnailStore::new(settings.thumbnails().clone());
        if let Err(e) = run_blocking(move || store.delete(&owner)).await {
            tracing::warn!(error = %e, "Failed to delete thumbnails");
        }

        tracing::info!(files = media.files.len(), "Deleted media");
        Ok(Some(media))
    }

    /// Best effort: failures are logged and never returned.
    async fn delete_physical(&self, files: &[FileRecord], settings: &IngestSettings) {
        let engines = match self.engines_by_id(settings).await {
            Ok(engines) => engines,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot load engines, leaving physical data");
                return;
            }
        };
        for file in files {
            let Some(engine) = engines.get(&file.engine_id) else {
                tracing::warn!(
                    file_id = ?file.id,
                    engine_id = file.engine_id,
                    "No engine for file, leaving physical data"
                );
                continue;
            };
            match engine.delete(file).await {
                Ok(()) => tracing::debug!(file_id = ?file.id, "Deleted physical data"),
                Err(e) => tracing::warn!(
                    file_id = ?file.id,
                    engine_type = engine.engine_type(),
                    error = %e,
                    "Failed to delete physical data"
                ),
            }
        }
    }

    /// Access points of one file, from its owning engine.
    ///
    /// Files whose engine is no longer configured have no URIs.
    pub async fn file_uris(
        &self,
        file: &FileRecord,
        settings: &IngestSettings,
    ) -> MedialoomResult<Vec<StorageUri>> {
        let engines = self.engines_by_id(settings).await?;
        Ok(uris_of(&engines, file))
    }

    /// Access points of every file of a media item.
    pub async fn media_uris(
        &self,
        media: &MediaRecord,
        settings: &IngestSettings,
    ) -> MedialoomResult<Vec<StorageUri>> {
        let engines = self.engines_by_id(settings).await?;
        Ok(media
            .files
            .iter()
            .flat_map(|file| uris_of(&engines, file))
            .collect())
    }
}

fn uris_of(engines: &HashMap<i32, Arc<dyn StorageEngine>>, file: &FileRecord) -> Vec<StorageUri> {
    engines
        .get(&file.engine_id)
        .map(|engine| engine.get_uris(&Arc::new(file.clone())))
        .unwrap_or_default()
}

/// Ask each engine in turn to parse the source.
async fn select_engine(
    engines: &[Arc<dyn StorageEngine>],
    source: &IngestSource,
) -> MedialoomResult<(Arc<dyn StorageEngine>, FileMetadata)> {
    for engine in engines {
        match engine.parse(source).await {
            Ok(meta) => {
                tracing::debug!(engine_type = engine.engine_type(), "Engine accepted source");
                return Ok((engine.clone(), meta));
            }
            Err(e) if e.is_unsuitable() => {
                tracing::debug!(engine_type = engine.engine_type(), reason = %e, "Engine declined source");
            }
            Err(e) => return Err(e),
        }
    }
    Err(StorageError::new(StorageErrorKind::NoUsableEngine).into())
}

fn pending_file(
    media_id: i32,
    engine: &dyn StorageEngine,
    meta: &FileMetadata,
    source: &IngestSource,
) -> FileRecord {
    let display_name = meta
        .display_name
        .clone()
        .unwrap_or_else(|| source.default_display_name());
    let mut file = FileRecord::pending(media_id, engine.id(), meta.kind, display_name);
    file.unique_id = meta.unique_id.clone();
    file.container = meta.container.clone();
    file.size = meta.size;
    file.width = meta.width;
    file.height = meta.height;
    file.bitrate = meta.bitrate;
    file
}

/// The transactional part of an ingest.
async fn store_file(
    tx: &mut dyn RepositoryTransaction,
    engine: &dyn StorageEngine,
    media: &mut MediaRecord,
    file: &mut FileRecord,
    source: &IngestSource,
    meta: &FileMetadata,
) -> MedialoomResult<()> {
    tx.flush_file(file).await?;

    let stored = engine.store(media, file, source, meta).await?;
    file.state = FileState::Stored;
    let unique_id = stored.or_else(|| file.unique_id.clone()).ok_or_else(|| {
        StorageError::new(StorageErrorKind::MissingUniqueId(
            engine.engine_type().to_string(),
        ))
    })?;
    file.unique_id = Some(unique_id);
    tx.flush_file(file).await?;

    media.files.push(file.clone());
    if media.title.is_none() {
        media.title = Some(meta.title.clone().unwrap_or_else(|| file.display_name.clone()));
    }
    if media.duration.unwrap_or(0) == 0 {
        media.duration = meta.duration.or(media.duration);
    }
    media.update_status();
    tx.update_media(media).await
}

/// Remove data an engine wrote for a file whose ingest was rolled back.
async fn discard_stored(engine: &dyn StorageEngine, file: &FileRecord) {
    match engine.delete(file).await {
        Ok(()) => tracing::info!(engine_type = engine.engine_type(), "Discarded stored data"),
        Err(e) => tracing::warn!(
            engine_type = engine.engine_type(),
            error = %e,
            "Failed to discard stored data"
        ),
    }
}

/// Offer a freshly stored file to each engine until one transcodes it.
async fn offer_transcode(engines: &[Arc<dyn StorageEngine>], file: &FileRecord) {
    for engine in engines {
        match engine.transcode(file).await {
            Ok(()) => {
                tracing::info!(engine_type = engine.engine_type(), "Transcoding started");
                return;
            }
            Err(e) if e.is_cannot_transcode() => continue,
            Err(e) => tracing::warn!(
                engine_type = engine.engine_type(),
                error = %e,
                "Transcode failed"
            ),
        }
    }
    tracing::debug!(file_id = ?file.id, "No engine transcodes this file");
}

async fn run_blocking<T, F>(work: F) -> MedialoomResult<T>
where
    F: FnOnce() -> MedialoomResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ThumbnailError::new(ThumbnailErrorKind::Io(e.to_string())))?
}

//! The storage engine trait.

use async_trait::async_trait;
use medialoom_core::{
    EngineInstance, FileMetadata, FileRecord, IngestSettings, IngestSource, MediaRecord,
    StorageUri,
};
use medialoom_error::{CannotTranscodeError, MedialoomResult};
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Shared resources handed to engine factories.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct EngineContext {
    /// HTTP client for metadata lookups
    http: reqwest::Client,
    /// Per-call timeout for outbound requests
    http_timeout: Duration,
    /// Fallback directory for file engines without a configured path
    media_dir: PathBuf,
}

impl EngineContext {
    /// Build a context from an HTTP client and a settings snapshot.
    pub fn new(http: reqwest::Client, settings: &IngestSettings) -> Self {
        Self {
            http,
            http_timeout: *settings.http_timeout(),
            media_dir: settings.media_dir().clone(),
        }
    }
}

/// One configured storage backend.
///
/// Engines are built from an [`EngineInstance`] by the factory of their
/// [`EngineDescriptor`](crate::EngineDescriptor). They decline inputs they
/// cannot handle with [`UnsuitableEngineError`](medialoom_error::UnsuitableEngineError)
/// and decline transcoding with [`CannotTranscodeError`].
#[async_trait]
pub trait StorageEngine: Send + Sync + Debug {
    /// The persisted instance this engine was built from.
    fn instance(&self) -> &EngineInstance;

    /// Engine type tag.
    fn engine_type(&self) -> &str {
        self.instance().engine_type()
    }

    /// Engine instance id.
    fn id(&self) -> i32 {
        *self.instance().id()
    }

    /// Extract metadata from an upload or URL.
    ///
    /// # Errors
    ///
    /// Returns an unsuitable-engine error when this engine does not handle
    /// the input. Any other error aborts the ingest.
    async fn parse(&self, source: &IngestSource) -> MedialoomResult<FileMetadata>;

    /// Persist the file.
    ///
    /// `file` has been flushed and carries its id, but nothing is committed
    /// yet; an error here rolls the ingest back. Returns the unique id when
    /// this engine generates or overrides it, `None` to keep the id from
    /// [`parse`](StorageEngine::parse).
    async fn store(
        &self,
        media: &MediaRecord,
        file: &FileRecord,
        source: &IngestSource,
        meta: &FileMetadata,
    ) -> MedialoomResult<Option<String>>;

    /// Delete the physical resource behind a file.
    async fn delete(&self, file: &FileRecord) -> MedialoomResult<()>;

    /// Transcode an existing file, possibly stored by another engine.
    async fn transcode(&self, _file: &FileRecord) -> MedialoomResult<()> {
        Err(CannotTranscodeError::new(format!(
            "{} does not support transcoding",
            self.engine_type()
        ))
        .into())
    }

    /// Every access point of a stored file.
    fn get_uris(&self, file: &Arc<FileRecord>) -> Vec<StorageUri>;
}

//! Repository traits.

use async_trait::async_trait;
use medialoom_core::{EngineInstance, FileRecord, MediaRecord};
use medialoom_error::MedialoomResult;

/// Storage for media, files and engine instances.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// List configured engine instances ordered by id.
    ///
    /// # Arguments
    ///
    /// * `enabled_only` - Skip disabled instances
    async fn list_engines(&self, enabled_only: bool) -> MedialoomResult<Vec<EngineInstance>>;

    /// Create an enabled engine instance.
    ///
    /// # Errors
    ///
    /// Fails if another instance already uses `display_name`.
    async fn create_engine(
        &self,
        engine_type: &str,
        display_name: &str,
        data: serde_json::Value,
    ) -> MedialoomResult<EngineInstance>;

    /// Replace an engine instance's configuration object.
    async fn update_engine_data(&self, engine_id: i32, data: serde_json::Value)
    -> MedialoomResult<()>;

    /// Load a media record with its files and categories.
    async fn load_media(&self, media_id: i32) -> MedialoomResult<MediaRecord>;

    /// Open a transaction.
    async fn begin(&self) -> MedialoomResult<Box<dyn RepositoryTransaction>>;

    /// Delete one file row, returning it if it existed.
    async fn delete_file(&self, file_id: i32) -> MedialoomResult<Option<FileRecord>>;

    /// Delete a media row and all its files, returning the media as it was.
    async fn delete_media(&self, media_id: i32) -> MedialoomResult<Option<MediaRecord>>;
}

/// An open unit of work.
///
/// Nothing written through a transaction is visible to other readers until
/// [`commit`](RepositoryTransaction::commit). Dropping a transaction without
/// committing discards its writes.
#[async_trait]
pub trait RepositoryTransaction: Send {
    /// Insert or update a file row. Assigns `file.id` on first flush.
    async fn flush_file(&mut self, file: &mut FileRecord) -> MedialoomResult<()>;

    /// Write the media row's own columns (not its files).
    async fn update_media(&mut self, media: &MediaRecord) -> MedialoomResult<()>;

    /// Make all writes durable.
    async fn commit(self: Box<Self>) -> MedialoomResult<()>;

    /// Discard all writes.
    async fn rollback(self: Box<Self>) -> MedialoomResult<()>;
}

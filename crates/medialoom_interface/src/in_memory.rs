//! In-memory implementation of MediaRepository for testing.
//!
//! Rows live in BTreeMaps behind an RwLock. Transactions stage their writes
//! and apply them under a single write lock on commit. Ids come from
//! counters that are never rewound, so a rolled-back flush burns its id the
//! same way a database sequence would.

use crate::{MediaRepository, RepositoryTransaction};
use async_trait::async_trait;
use chrono::Utc;
use medialoom_core::{EngineInstance, FileRecord, MediaRecord};
use medialoom_error::{
    EngineError, EngineErrorKind, MedialoomResult, StorageError, StorageErrorKind,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct State {
    engines: BTreeMap<i32, EngineInstance>,
    media: BTreeMap<i32, MediaRecord>,
    next_engine_id: i32,
    next_media_id: i32,
    next_file_id: i32,
}

impl State {
    fn take_file_id(&mut self) -> i32 {
        self.next_file_id += 1;
        self.next_file_id
    }
}

/// In-memory repository for media, files and engine instances.
///
/// # Example
///
/// ```
/// use medialoom_core::MediaRecord;
/// use medialoom_interface::{InMemoryMediaRepository, MediaRepository};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = InMemoryMediaRepository::new();
/// let id = repo.insert_media(MediaRecord::new(None, "intro")).await;
/// let media = repo.load_media(id).await?;
/// assert_eq!(media.slug, "intro");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryMediaRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryMediaRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a media record (and any files it carries) directly.
    ///
    /// Missing ids are assigned. Returns the media id.
    pub async fn insert_media(&self, mut media: MediaRecord) -> i32 {
        let mut state = self.state.write().await;
        let id = match media.id {
            Some(id) => {
                state.next_media_id = state.next_media_id.max(id);
                id
            }
            None => {
                state.next_media_id += 1;
                state.next_media_id
            }
        };
        media.id = Some(id);
        for file in &mut media.files {
            file.media_id = id;
            if file.id.is_none() {
                file.id = Some(state.take_file_id());
            }
        }
        state.media.insert(id, media);
        id
    }

    /// Disable or enable an engine instance (for testing).
    pub async fn set_engine_enabled(&self, engine_id: i32, enabled: bool) {
        let mut state = self.state.write().await;
        if let Some(engine) = state.engines.remove(&engine_id) {
            state.engines.insert(engine_id, engine.with_enabled(enabled));
        }
    }

    /// Number of stored media records (for testing).
    pub async fn media_count(&self) -> usize {
        self.state.read().await.media.len()
    }

    /// Number of stored file rows across all media (for testing).
    pub async fn file_count(&self) -> usize {
        self.state
            .read()
            .await
            .media
            .values()
            .map(|m| m.files.len())
            .sum()
    }
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn list_engines(&self, enabled_only: bool) -> MedialoomResult<Vec<EngineInstance>> {
        let state = self.state.read().await;
        Ok(state
            .engines
            .values()
            .filter(|e| !enabled_only || *e.enabled())
            .cloned()
            .collect())
    }

    async fn create_engine(
        &self,
        engine_type: &str,
        display_name: &str,
        data: serde_json::Value,
    ) -> MedialoomResult<EngineInstance> {
        let mut state = self.state.write().await;
        if state
            .engines
            .values()
            .any(|e| e.display_name() == display_name)
        {
            return Err(EngineError::new(EngineErrorKind::DuplicateDisplayName(
                display_name.to_string(),
            ))
            .into());
        }
        state.next_engine_id += 1;
        let engine = EngineInstance::new(state.next_engine_id, engine_type, display_name, data);
        state.engines.insert(*engine.id(), engine.clone());
        tracing::debug!(engine_id = engine.id(), engine_type, "Created engine instance");
        Ok(engine)
    }

    async fn update_engine_data(
        &self,
        engine_id: i32,
        data: serde_json::Value,
    ) -> MedialoomResult<()> {
        let mut state = self.state.write().await;
        let engine = state.engines.remove(&engine_id).ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound(format!("engine {}", engine_id)))
        })?;
        let updated = EngineInstance::from_parts(
            *engine.id(),
            engine.engine_type().clone(),
            engine.display_name().clone(),
            *engine.enabled(),
            *engine.created_on(),
            Utc::now(),
            data,
        );
        state.engines.insert(engine_id, updated);
        Ok(())
    }

    async fn load_media(&self, media_id: i32) -> MedialoomResult<MediaRecord> {
        let state = self.state.read().await;
        state.media.get(&media_id).cloned().ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound(format!("media {}", media_id))).into()
        })
    }

    async fn begin(&self) -> MedialoomResult<Box<dyn RepositoryTransaction>> {
        Ok(Box::new(InMemoryTransaction {
            state: Arc::clone(&self.state),
            files: Vec::new(),
            media: None,
        }))
    }

    async fn delete_file(&self, file_id: i32) -> MedialoomResult<Option<FileRecord>> {
        let mut state = self.state.write().await;
        for media in state.media.values_mut() {
            if let Some(pos) = media.files.iter().position(|f| f.id == Some(file_id)) {
                return Ok(Some(media.files.remove(pos)));
            }
        }
        Ok(None)
    }

    async fn delete_media(&self, media_id: i32) -> MedialoomResult<Option<MediaRecord>> {
        Ok(self.state.write().await.media.remove(&media_id))
    }
}

/// Staged writes of one in-memory transaction.
struct InMemoryTransaction {
    state: Arc<RwLock<State>>,
    files: Vec<FileRecord>,
    media: Option<MediaRecord>,
}

#[async_trait]
impl RepositoryTransaction for InMemoryTransaction {
    async fn flush_file(&mut self, file: &mut FileRecord) -> MedialoomResult<()> {
        let id = match file.id {
            Some(id) => id,
            None => {
                let id = self.state.write().await.take_file_id();
                file.id = Some(id);
                id
            }
        };
        file.modified_on = Utc::now();
        match self.files.iter_mut().find(|f| f.id == Some(id)) {
            Some(staged) => *staged = file.clone(),
            None => self.files.push(file.clone()),
        }
        Ok(())
    }

    async fn update_media(&mut self, media: &MediaRecord) -> MedialoomResult<()> {
        if media.id.is_none() {
            return Err(StorageError::new(StorageErrorKind::UnsavedMedia).into());
        }
        self.media = Some(media.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> MedialoomResult<()> {
        let InMemoryTransaction {
            state,
            files,
            media,
        } = *self;
        let mut state = state.write().await;

        let missing = media
            .iter()
            .filter_map(|m| m.id)
            .chain(files.iter().map(|f| f.media_id))
            .find(|id| !state.media.contains_key(id));
        if let Some(id) = missing {
            return Err(
                StorageError::new(StorageErrorKind::NotFound(format!("media {}", id))).into(),
            );
        }

        if let Some(update) = media
            && let Some(id) = update.id
            && let Some(stored) = state.media.get_mut(&id)
        {
            stored.slug = update.slug;
            stored.title = update.title;
            stored.description = update.description;
            stored.kind = update.kind;
            stored.duration = update.duration;
            stored.publish_on = update.publish_on;
            stored.reviewed = update.reviewed;
            stored.publishable = update.publishable;
            stored.encoded = update.encoded;
            stored.modified_on = Utc::now();
        }

        for file in files {
            let Some(stored) = state.media.get_mut(&file.media_id) else {
                continue;
            };
            match stored.files.iter_mut().find(|f| f.id == file.id) {
                Some(existing) => *existing = file,
                None => stored.files.push(file),
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> MedialoomResult<()> {
        tracing::debug!(staged_files = self.files.len(), "Rolling back in-memory transaction");
        Ok(())
    }
}

//! Scriptable storage engine.

use async_trait::async_trait;
use medialoom_core::{
    EngineInstance, FileMetadata, FileRecord, IngestSource, MediaKind, MediaRecord, StorageUri,
    ThumbnailSource,
};
use medialoom_error::{
    CannotTranscodeError, MedialoomResult, StorageError, StorageErrorKind, UnsuitableEngineError,
};
use medialoom_storage::{EngineDescriptor, StorageEngine};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What a mock engine does when asked.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Parse succeeds
    pub accepts: bool,
    /// Parse fails with a non-signal error
    pub fails_parse: bool,
    /// Unique id reported by parse
    pub parsed_id: Option<String>,
    /// Unique id returned by store
    pub stored_id: Option<String>,
    /// Store fails
    pub fails_store: bool,
    /// Transcode succeeds (otherwise it declines)
    pub transcodes: bool,
    /// Transcode fails with a non-signal error
    pub fails_transcode: bool,
    /// Title suggested by parse
    pub title: Option<String>,
    /// Duration suggested by parse
    pub duration: Option<u32>,
    /// Container reported by parse
    pub container: Option<String>,
    /// Thumbnail reported by parse
    pub thumbnail: Option<ThumbnailSource>,
    /// Delete fails
    pub fails_delete: bool,
}

impl MockConfig {
    /// A mock that accepts everything and returns `parsed_id` from parse.
    pub fn accepting(parsed_id: &str) -> Self {
        Self {
            accepts: true,
            parsed_id: Some(parsed_id.to_string()),
            ..Self::default()
        }
    }

    /// A mock that declines everything.
    pub fn declining() -> Self {
        Self::default()
    }
}

/// Call counters shared by every engine built from one descriptor.
#[derive(Debug, Default)]
pub struct MockCalls {
    pub parse: AtomicUsize,
    pub store: AtomicUsize,
    pub delete: AtomicUsize,
    pub transcode: AtomicUsize,
}

impl MockCalls {
    pub fn parses(&self) -> usize {
        self.parse.load(Ordering::SeqCst)
    }

    pub fn stores(&self) -> usize {
        self.store.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.delete.load(Ordering::SeqCst)
    }

    pub fn transcodes(&self) -> usize {
        self.transcode.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MockEngine {
    instance: EngineInstance,
    config: MockConfig,
    calls: Arc<MockCalls>,
}

impl MockEngine {
    pub fn new(instance: EngineInstance, config: MockConfig, calls: Arc<MockCalls>) -> Self {
        Self {
            instance,
            config,
            calls,
        }
    }
}

#[async_trait]
impl StorageEngine for MockEngine {
    fn instance(&self) -> &EngineInstance {
        &self.instance
    }

    async fn parse(&self, _source: &IngestSource) -> MedialoomResult<FileMetadata> {
        self.calls.parse.fetch_add(1, Ordering::SeqCst);
        if self.config.fails_parse {
            return Err(StorageError::new(StorageErrorKind::FileRead("mock parse".into())).into());
        }
        if !self.config.accepts {
            return Err(UnsuitableEngineError::new("mock declines").into());
        }
        let mut meta = FileMetadata::new(MediaKind::Video);
        meta.unique_id = self.config.parsed_id.clone();
        meta.container = self.config.container.clone();
        meta.title = self.config.title.clone();
        meta.duration = self.config.duration;
        meta.thumbnail = self.config.thumbnail.clone();
        Ok(meta)
    }

    async fn store(
        &self,
        _media: &MediaRecord,
        file: &FileRecord,
        _source: &IngestSource,
        _meta: &FileMetadata,
    ) -> MedialoomResult<Option<String>> {
        self.calls.store.fetch_add(1, Ordering::SeqCst);
        assert!(file.id.is_some(), "store must see a flushed file");
        if self.config.fails_store {
            return Err(StorageError::new(StorageErrorKind::FileWrite("mock store".into())).into());
        }
        Ok(self.config.stored_id.clone())
    }

    async fn delete(&self, _file: &FileRecord) -> MedialoomResult<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        if self.config.fails_delete {
            return Err(StorageError::new(StorageErrorKind::Backend("mock delete".into())).into());
        }
        Ok(())
    }

    async fn transcode(&self, _file: &FileRecord) -> MedialoomResult<()> {
        self.calls.transcode.fetch_add(1, Ordering::SeqCst);
        if self.config.fails_transcode {
            return Err(StorageError::new(StorageErrorKind::Backend("mock transcode".into())).into());
        }
        if self.config.transcodes {
            Ok(())
        } else {
            Err(CannotTranscodeError::new("mock declines").into())
        }
    }

    fn get_uris(&self, file: &Arc<FileRecord>) -> Vec<StorageUri> {
        match file.unique_id.as_deref() {
            Some(id) => vec![StorageUri::new(
                file.clone(),
                "http",
                format!("http://mock.example.org/{}", id),
            )],
            None => Vec::new(),
        }
    }
}

/// Descriptor building [`MockEngine`]s with `config`, plus their call counters.
pub fn mock_descriptor(engine_type: &str, config: MockConfig) -> (EngineDescriptor, Arc<MockCalls>) {
    let calls = Arc::new(MockCalls::default());
    let shared = calls.clone();
    let descriptor = EngineDescriptor::new(engine_type, engine_type, move |instance, _ctx| {
        Ok(Arc::new(MockEngine::new(instance, config.clone(), shared.clone())) as Arc<dyn StorageEngine>)
    });
    (descriptor, calls)
}

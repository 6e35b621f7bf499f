//! Engine for arbitrary remote URLs.

use super::EMBED_FAMILY;
use crate::{EngineDescriptor, StorageEngine};
use async_trait::async_trait;
use medialoom_core::{
    EngineInstance, FileMetadata, FileRecord, IngestSource, MediaRecord, StorageUri, filetypes,
};
use medialoom_error::{MedialoomResult, UnsuitableEngineError};
use std::sync::Arc;

/// Links to media hosted elsewhere over HTTP(S) or RTMP.
///
/// Tried after every embed engine so that known video sites are recognised
/// first. The URL itself is the unique id; nothing is downloaded.
#[derive(Debug)]
pub struct RemoteUrlStorage {
    instance: EngineInstance,
}

impl RemoteUrlStorage {
    /// Create the engine.
    pub fn new(instance: EngineInstance) -> Self {
        Self { instance }
    }
}

/// Split an RTMP URL into server and stream parts at the last `/`.
fn split_rtmp(url: &str) -> Option<(&str, &str)> {
    let (server, stream) = url.rsplit_once('/')?;
    if stream.is_empty() || server.ends_with('/') {
        return None;
    }
    Some((server, stream))
}

#[async_trait]
impl StorageEngine for RemoteUrlStorage {
    fn instance(&self) -> &EngineInstance {
        &self.instance
    }

    async fn parse(&self, source: &IngestSource) -> MedialoomResult<FileMetadata> {
        let raw = source
            .as_url()
            .ok_or_else(|| UnsuitableEngineError::new("remote URL engine only accepts URLs"))?;
        let url = url::Url::parse(raw.trim())
            .map_err(|e| UnsuitableEngineError::new(format!("unparseable URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https" | "rtmp") || url.host_str().is_none() {
            return Err(UnsuitableEngineError::new(format!(
                "unsupported URL scheme '{}'",
                url.scheme()
            ))
            .into());
        }

        let last_segment = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        let (_, ext) = filetypes::split_extension(last_segment);
        let container = filetypes::guess_container_format(&ext);

        let mut meta = FileMetadata::new(filetypes::guess_media_type(container))
            .with_unique_id(url.as_str());
        if let Some(container) = container {
            meta = meta.with_container(container);
        }
        if !last_segment.is_empty() {
            meta = meta.with_display_name(last_segment);
        }
        Ok(meta)
    }

    async fn store(
        &self,
        _media: &MediaRecord,
        _file: &FileRecord,
        _source: &IngestSource,
        _meta: &FileMetadata,
    ) -> MedialoomResult<Option<String>> {
        Ok(None)
    }

    async fn delete(&self, _file: &FileRecord) -> MedialoomResult<()> {
        Ok(())
    }

    fn get_uris(&self, file: &Arc<FileRecord>) -> Vec<StorageUri> {
        let Some(url) = file.unique_id.as_deref() else {
            return Vec::new();
        };
        if url.starts_with("rtmp://") {
            return match split_rtmp(url) {
                Some((server, stream)) => {
                    vec![StorageUri::new(file.clone(), "rtmp", stream).with_server_uri(server)]
                }
                None => vec![StorageUri::new(file.clone(), "rtmp", url)],
            };
        }
        vec![StorageUri::new(file.clone(), "http", url)]
    }
}

/// Descriptor for `remote_urls`.
pub fn remote_urls() -> EngineDescriptor {
    EngineDescriptor::new("remote_urls", "Remote URLs", |instance, _ctx| {
        Ok(Arc::new(RemoteUrlStorage::new(instance)) as Arc<dyn StorageEngine>)
    })
    .singleton()
    .try_after(EMBED_FAMILY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rtmp_split() {
        assert_eq!(
            split_rtmp("rtmp://stream.example.org/vod/clip.flv"),
            Some(("rtmp://stream.example.org/vod", "clip.flv"))
        );
        assert_eq!(split_rtmp("rtmp://stream.example.org/"), None);
    }
}

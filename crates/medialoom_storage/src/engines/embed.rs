//! Engines for URLs of known video sites.
//!
//! Each site is an [`EmbedSite`]: a URL pattern with a named `id` capture,
//! the container tag stored on matching files, and templates for the site
//! link and the player URL. Matching URLs are never downloaded; the site's
//! oEmbed endpoint is asked for title, duration, size and thumbnail when
//! the instance configures one.

use super::{EMBED_FAMILY, FILE_FAMILY};
use crate::{EngineContext, EngineDescriptor, StorageEngine};
use async_trait::async_trait;
use medialoom_core::{
    EngineInstance, FileMetadata, FileRecord, IngestSource, MediaKind, MediaRecord, StorageUri,
    ThumbnailSource,
};
use medialoom_error::{HttpError, MedialoomResult, UnsuitableEngineError};
use regex::Regex;
use serde_json::json;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

/// Instance data key holding the oEmbed endpoint (`null` disables lookups).
pub const OEMBED_ENDPOINT_KEY: &str = "oembed_endpoint";

/// Static description of one video site.
#[derive(Debug)]
pub struct EmbedSite {
    /// Engine type tag
    pub engine_type: &'static str,
    /// Default instance display name
    pub default_name: &'static str,
    /// Human readable site name
    pub label: &'static str,
    /// Container tag and URI scheme of stored files
    pub container: &'static str,
    /// Pattern with a named `id` capture
    pub pattern: &'static LazyLock<Regex>,
    /// Site link template, `{id}` is replaced
    pub www_template: &'static str,
    /// Player URL template, `{id}` is replaced
    pub play_template: &'static str,
    /// oEmbed endpoint new instances start with
    pub default_oembed: Option<&'static str>,
}

impl EmbedSite {
    /// The video id in a URL, if the URL belongs to this site.
    pub fn match_id<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(url.trim())
            .and_then(|c| c.name("id"))
            .map(|m| m.as_str())
    }

    /// Link to the video on the site.
    pub fn www_url(&self, id: &str) -> String {
        self.www_template.replace("{id}", id)
    }

    /// URL of the embeddable player.
    pub fn play_url(&self, id: &str) -> String {
        self.play_template.replace("{id}", id)
    }
}

static YOUTUBE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|v/|embed/)|youtu\.be/)(?P<id>[A-Za-z0-9_-]+)",
    )
    .expect("Valid youtube regex")
});

static VIMEO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?vimeo\.com/(?P<id>\d+)").expect("Valid vimeo regex")
});

static BLIPTV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?blip\.tv/(?P<id>[^?#\s]+)").expect("Valid blip.tv regex")
});

static GOOGLE_VIDEO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?video\.google\.com/videoplay\?(?:.*&)?docid=(?P<id>-?\d+)")
        .expect("Valid google video regex")
});

/// YouTube.
pub static YOUTUBE: EmbedSite = EmbedSite {
    engine_type: "youtube",
    default_name: "YouTube",
    label: "YouTube",
    container: "youtube",
    pattern: &YOUTUBE_PATTERN,
    www_template: "https://www.youtube.com/watch?v={id}",
    play_template: "https://www.youtube.com/embed/{id}",
    default_oembed: Some("https://www.youtube.com/oembed"),
};

/// Vimeo.
pub static VIMEO: EmbedSite = EmbedSite {
    engine_type: "vimeo",
    default_name: "Vimeo",
    label: "Vimeo",
    container: "vimeo",
    pattern: &VIMEO_PATTERN,
    www_template: "https://vimeo.com/{id}",
    play_template: "https://player.vimeo.com/video/{id}",
    default_oembed: Some("https://vimeo.com/api/oembed.json"),
};

/// BlipTV.
pub static BLIPTV: EmbedSite = EmbedSite {
    engine_type: "bliptv",
    default_name: "BlipTV",
    label: "BlipTV",
    container: "bliptv",
    pattern: &BLIPTV_PATTERN,
    www_template: "http://blip.tv/{id}",
    play_template: "http://blip.tv/play/{id}",
    default_oembed: None,
};

/// Google Video.
pub static GOOGLE_VIDEO: EmbedSite = EmbedSite {
    engine_type: "google_video",
    default_name: "Google Video",
    label: "Google Video",
    container: "googlevideo",
    pattern: &GOOGLE_VIDEO_PATTERN,
    www_template: "http://video.google.com/videoplay?docid={id}",
    play_template: "http://video.google.com/googleplayer.swf?docid={id}",
    default_oembed: None,
};

/// Engine for one video site.
#[derive(Debug)]
pub struct EmbedStorage {
    instance: EngineInstance,
    site: &'static EmbedSite,
    http: reqwest::Client,
    timeout: Duration,
    oembed_endpoint: Option<String>,
}

impl EmbedStorage {
    /// Create an engine for `site`.
    pub fn new(instance: EngineInstance, site: &'static EmbedSite, ctx: &EngineContext) -> Self {
        let oembed_endpoint = instance.data_str(OEMBED_ENDPOINT_KEY).map(str::to_string);
        Self {
            instance,
            site,
            http: ctx.http().clone(),
            timeout: *ctx.http_timeout(),
            oembed_endpoint,
        }
    }

    /// The site this engine handles.
    pub fn site(&self) -> &'static EmbedSite {
        self.site
    }

    async fn fetch_oembed(&self, endpoint: &str, www_url: &str) -> MedialoomResult<serde_json::Value> {
        let response = self
            .http
            .get(endpoint)
            .query(&[("url", www_url), ("format", "json")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| HttpError::for_url(endpoint, e))?
            .error_for_status()
            .map_err(|e| HttpError::for_url(endpoint, e))?;
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| HttpError::for_url(endpoint, e))?;
        Ok(body)
    }
}

/// Copy oEmbed fields onto parsed metadata.
fn apply_oembed(mut meta: FileMetadata, body: &serde_json::Value) -> FileMetadata {
    let number = |key: &str| {
        body.get(key)
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };
    if let Some(title) = body.get("title").and_then(serde_json::Value::as_str) {
        meta = meta.with_title(title);
    }
    if let Some(duration) = number("duration") {
        meta = meta.with_duration(duration);
    }
    if let Some(width) = number("width") {
        meta = meta.with_width(width);
    }
    if let Some(height) = number("height") {
        meta = meta.with_height(height);
    }
    if let Some(thumb) = body.get("thumbnail_url").and_then(serde_json::Value::as_str) {
        meta = meta.with_thumbnail(ThumbnailSource::Url(thumb.to_string()));
    }
    meta
}

#[async_trait]
impl StorageEngine for EmbedStorage {
    fn instance(&self) -> &EngineInstance {
        &self.instance
    }

    #[tracing::instrument(skip_all, fields(engine_type = self.engine_type()))]
    async fn parse(&self, source: &IngestSource) -> MedialoomResult<FileMetadata> {
        let url = source
            .as_url()
            .ok_or_else(|| UnsuitableEngineError::new("embed engines only accept URLs"))?;
        let id = self.site.match_id(url).ok_or_else(|| {
            UnsuitableEngineError::new(format!("not a {} URL", self.site.label))
        })?;

        let meta = FileMetadata::new(MediaKind::Video)
            .with_unique_id(id)
            .with_container(self.site.container)
            .with_display_name(format!("{} {}", self.site.label, id));

        let Some(endpoint) = self.oembed_endpoint.as_deref() else {
            return Ok(meta);
        };
        match self.fetch_oembed(endpoint, &self.site.www_url(id)).await {
            Ok(body) => Ok(apply_oembed(meta, &body)),
            Err(e) => {
                tracing::warn!(error = %e, "oEmbed lookup failed, continuing without it");
                Ok(meta)
            }
        }
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
        let Some(id) = file.unique_id.as_deref() else {
            return Vec::new();
        };
        vec![
            StorageUri::new(file.clone(), "www", self.site.www_url(id)),
            StorageUri::new(file.clone(), self.site.container, self.site.play_url(id)),
        ]
    }
}

fn descriptor(site: &'static EmbedSite) -> EngineDescriptor {
    EngineDescriptor::new(site.engine_type, site.default_name, move |instance, ctx| {
        Ok(Arc::new(EmbedStorage::new(instance, site, ctx)) as Arc<dyn StorageEngine>)
    })
    .singleton()
    .family(EMBED_FAMILY)
    .try_after(FILE_FAMILY)
    .default_data(json!({ "oembed_endpoint": site.default_oembed }))
}

/// Descriptor for `youtube`.
pub fn youtube() -> EngineDescriptor {
    descriptor(&YOUTUBE)
}

/// Descriptor for `vimeo`.
pub fn vimeo() -> EngineDescriptor {
    descriptor(&VIMEO)
}

/// Descriptor for `bliptv`.
pub fn bliptv() -> EngineDescriptor {
    descriptor(&BLIPTV)
}

/// Descriptor for `google_video`.
pub fn google_video() -> EngineDescriptor {
    descriptor(&GOOGLE_VIDEO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_ids() {
        for url in [
            "http://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(YOUTUBE.match_id(url), Some("dQw4w9WgXcQ"), "{}", url);
        }
        assert_eq!(YOUTUBE.match_id("https://vimeo.com/1234"), None);
    }

    #[test]
    fn other_sites() {
        assert_eq!(VIMEO.match_id("http://vimeo.com/2696386"), Some("2696386"));
        assert_eq!(BLIPTV.match_id("http://blip.tv/file/1077460"), Some("file/1077460"));
        assert_eq!(
            GOOGLE_VIDEO.match_id("http://video.google.com/videoplay?docid=-8145744599367467364"),
            Some("-8145744599367467364")
        );
    }

    #[test]
    fn oembed_fields() {
        let body = json!({
            "title": "Opening keynote",
            "duration": 3605,
            "width": 640,
            "height": 360,
            "thumbnail_url": "https://i.vimeocdn.com/video/1.jpg",
        });
        let meta = apply_oembed(FileMetadata::new(MediaKind::Video), &body);
        assert_eq!(meta.title.as_deref(), Some("Opening keynote"));
        assert_eq!(meta.duration, Some(3605));
        assert_eq!((meta.width, meta.height), (Some(640), Some(360)));
        assert!(matches!(meta.thumbnail, Some(ThumbnailSource::Url(_))));
    }

    #[tokio::test]
    async fn oembed_failure_names_endpoint() {
        let thumbnails = medialoom_core::ThumbnailSettings::builder()
            .image_dir("images")
            .build()
            .expect("thumbnail settings");
        let settings = medialoom_core::IngestSettings::builder()
            .http_timeout(Duration::from_millis(500))
            .media_dir("media")
            .thumbnails(thumbnails)
            .build()
            .expect("ingest settings");
        let ctx = EngineContext::new(reqwest::Client::new(), &settings);
        let endpoint = "http://127.0.0.1:9/oembed";
        let instance = EngineInstance::new(
            1,
            "youtube",
            "YouTube",
            json!({"oembed_endpoint": endpoint}),
        );
        let engine = EmbedStorage::new(instance, &YOUTUBE, &ctx);

        let err = engine
            .fetch_oembed(endpoint, &YOUTUBE.www_url("dQw4w9WgXcQ"))
            .await
            .expect_err("nothing listens on the discard port");
        match err.kind() {
            medialoom_error::MedialoomErrorKind::Http(http) => {
                assert_eq!(http.url.as_deref(), Some(endpoint));
            }
            other => panic!("expected http error, got {:?}", other),
        }

        // Parse still succeeds without oEmbed fields.
        let meta = engine
            .parse(&IngestSource::Url(
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            ))
            .await
            .expect("parse");
        assert_eq!(meta.unique_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert!(meta.title.is_none());
    }
}

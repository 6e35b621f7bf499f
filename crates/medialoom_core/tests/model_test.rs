//! Tests for the Medialoom data model.

use medialoom_core::{
    FileRecord, IngestSettings, IngestSource, MediaKind, MediaRecord, StorageUri,
    ThumbnailSettings, UploadedFile, UriField, filetypes,
};
use std::sync::Arc;
use std::time::Duration;

fn mp4_file() -> FileRecord {
    FileRecord::pending(3, 1, MediaKind::Video, "Keynote.mp4")
        .with_id(12)
        .with_container("mp4")
        .with_unique_id("12-keynote.mp4")
        .with_size(4096u64)
}

#[test]
fn test_container_sniffing() {
    assert_eq!(filetypes::guess_container_format("mp3"), Some("mp3"));
    assert_eq!(filetypes::guess_container_format(".Ogg"), Some("oga"));
    assert_eq!(filetypes::guess_container_format("docx"), None);

    assert_eq!(filetypes::guess_media_type(Some("flac")), MediaKind::Audio);
    assert_eq!(filetypes::guess_media_type(Some("mov")), MediaKind::Video);
    assert_eq!(filetypes::guess_media_type(None), MediaKind::Video);

    assert!(filetypes::is_playable_container("youtube"));
    assert!(!filetypes::is_playable_container("avi"));
}

#[test]
fn test_publish_requires_review_and_encoding() {
    let mut media = MediaRecord::new(Some(3), "keynote");
    media.update_status();
    assert!(!media.encoded);
    assert!(!media.can_publish());

    media.files.push(mp4_file());
    media.update_status();
    assert!(media.encoded);
    assert_eq!(media.kind, Some(MediaKind::Video));
    assert!(!media.can_publish());

    media.reviewed = true;
    assert!(media.can_publish());
}

#[test]
fn test_unplayable_files_do_not_encode() {
    let mut media = MediaRecord::new(Some(4), "raw");
    media
        .files
        .push(FileRecord::pending(4, 1, MediaKind::Video, "raw.avi").with_container("avi"));
    media.reviewed = true;
    media.update_status();
    assert!(!media.encoded);
    assert!(!media.can_publish());
}

#[test]
fn test_uri_fields_fall_through_to_file() {
    let uri = StorageUri::new(Arc::new(mp4_file()), "http", "http://cdn.example.org/12-keynote.mp4");

    assert_eq!(uri.field(UriField::Scheme).as_deref(), Some("http"));
    assert_eq!(uri.field(UriField::ServerUri), None);
    assert_eq!(uri.field(UriField::Container).as_deref(), Some("mp4"));
    assert_eq!(uri.field(UriField::Kind).as_deref(), Some("video"));
    assert_eq!(uri.field(UriField::DisplayName).as_deref(), Some("Keynote.mp4"));
    assert_eq!(uri.field(UriField::UniqueId).as_deref(), Some("12-keynote.mp4"));
    assert_eq!(uri.to_string(), "http://cdn.example.org/12-keynote.mp4");
}

#[test]
fn test_uri_joins_server_with_single_slash() {
    let file = Arc::new(mp4_file());
    let with_slash = StorageUri::new(file.clone(), "rtmp", "12-keynote.mp4")
        .with_server_uri("rtmp://stream.example.org/vod/");
    let without_slash = StorageUri::new(file, "rtmp", "12-keynote.mp4")
        .with_server_uri("rtmp://stream.example.org/vod");

    assert_eq!(with_slash.to_string(), "rtmp://stream.example.org/vod/12-keynote.mp4");
    assert_eq!(without_slash.to_string(), with_slash.to_string());
}

#[test]
fn test_default_display_name() {
    let upload = IngestSource::File(UploadedFile::new("My Talk.MP3", "/tmp/upload-1"));
    assert_eq!(upload.default_display_name(), "My Talk.MP3");

    let url = IngestSource::Url("https://example.org/a/b/episode-4.ogg".to_string());
    assert_eq!(url.default_display_name(), "episode-4.ogg");
    assert_eq!(url.as_url(), Some("https://example.org/a/b/episode-4.ogg"));
    assert!(url.as_file().is_none());
}

#[test]
fn test_settings_defaults() {
    let thumbnails = ThumbnailSettings::builder()
        .image_dir("/srv/images")
        .size("media", "s", (128, 72))
        .size("media", "l", (410, 231))
        .size("podcasts", "s", (128, 128))
        .build()
        .unwrap();
    let settings = IngestSettings::builder()
        .media_dir("/srv/media")
        .thumbnails(thumbnails)
        .build()
        .unwrap();

    assert_eq!(*settings.http_timeout(), Duration::from_secs(30));
    assert_eq!(settings.thumbnails().jpeg_quality(), 90);
    assert_eq!(settings.thumbnails().url_prefix(), "/images");
    assert_eq!(settings.thumbnails().sizes_for("media").map(|s| s.len()), Some(2));
    assert_eq!(settings.thumbnails().size_of("podcasts", "s"), Some((128, 128)));
    assert!(settings.thumbnails().sizes_for("users").is_none());
}

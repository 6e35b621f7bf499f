//! End-to-end tests of the built-in engines through the coordinator.

mod test_utils;

use medialoom_core::{IngestSource, MediaKind, MediaRecord, UploadedFile};
use medialoom_interface::{InMemoryMediaRepository, MediaRepository};
use medialoom_storage::{EngineRegistry, StorageCoordinator, uri};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use test_utils::test_settings;

async fn setup(
    engines: &[(&str, serde_json::Value)],
    slug: &str,
) -> (Arc<InMemoryMediaRepository>, StorageCoordinator, MediaRecord) {
    let repo = Arc::new(InMemoryMediaRepository::new());
    for (engine_type, data) in engines {
        repo.create_engine(engine_type, engine_type, data.clone())
            .await
            .expect("create engine");
    }
    let registry = EngineRegistry::with_builtin_engines().expect("registry");
    let coordinator = StorageCoordinator::new(Arc::new(registry), repo.clone());
    let media_id = repo.insert_media(MediaRecord::new(None, slug)).await;
    let media = repo.load_media(media_id).await.expect("load media");
    (repo, coordinator, media)
}

fn embed_engines() -> Vec<(&'static str, serde_json::Value)> {
    ["youtube", "vimeo", "bliptv", "google_video"]
        .into_iter()
        .map(|t| (t, json!({"oembed_endpoint": null})))
        .collect()
}

fn spool(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("spool upload");
    path
}

#[tokio::test]
async fn test_local_files_copies_upload() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let store_root = dir.path().join("store");
    let mut engines = vec![(
        "local_files",
        json!({"path": store_root, "base_url": "https://media.example.org/files/"}),
    )];
    engines.extend(embed_engines());
    let (_repo, coordinator, mut media) = setup(&engines, "keynote").await;

    let upload = spool(&dir, "upload-1", b"not really an mp4");
    let source = IngestSource::File(UploadedFile::new("Keynote Final.MP4", &upload));
    let file = coordinator
        .ingest(&mut media, &source, &settings)
        .await
        .expect("ingest");

    let id = file.id.expect("file id");
    let expected = format!("{}-keynotefinal.mp4", id);
    assert_eq!(file.unique_id.as_deref(), Some(expected.as_str()));
    assert_eq!(file.container.as_deref(), Some("mp4"));
    assert_eq!(file.kind, MediaKind::Video);
    assert_eq!(file.size, Some(17));
    assert_eq!(file.display_name, "Keynote Final.mp4");
    assert_eq!(
        std::fs::read(store_root.join(&expected)).expect("stored copy"),
        b"not really an mp4"
    );
    assert!(media.encoded);

    let uris = coordinator
        .file_uris(&file, &settings)
        .await
        .expect("uris");
    assert_eq!(
        uri::best_link_uri(&uris).map(|u| u.file_uri),
        Some(format!("https://media.example.org/files/{}", expected))
    );
    assert_eq!(uri::file_path(&uris), Some(store_root.join(&expected)));
}

#[tokio::test]
async fn test_media_folders_groups_by_slug() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let store_root = dir.path().join("store");
    let engines = vec![
        ("local_files", json!({"path": store_root})),
        ("media_folders", json!({"path": store_root})),
    ];
    let (repo, coordinator, mut media) = setup(&engines, "opening-night").await;

    let upload = spool(&dir, "upload-2", b"audio");
    let source = IngestSource::File(UploadedFile::new("interview.mp3", &upload));
    let file = coordinator
        .ingest(&mut media, &source, &settings)
        .await
        .expect("ingest");

    // media_folders sorts before local_files
    assert_eq!(file.engine_id, 2);
    assert_eq!(file.kind, MediaKind::Audio);
    let unique_id = file.unique_id.clone().expect("unique id");
    assert!(unique_id.starts_with("opening-night/"));
    let stored = store_root.join(&unique_id);
    assert!(stored.exists());

    coordinator
        .remove_file(file.id.expect("file id"), &settings)
        .await
        .expect("remove")
        .expect("file existed");
    assert!(!stored.exists());
    assert!(!store_root.join("opening-night").exists());
    assert_eq!(repo.file_count().await, 0);
}

#[tokio::test]
async fn test_file_engines_fall_back_to_media_dir() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let (_repo, coordinator, mut media) = setup(&[("local_files", json!({}))], "talk").await;

    let upload = spool(&dir, "upload-3", b"x");
    let source = IngestSource::File(UploadedFile::new("clip.webm", &upload));
    let file = coordinator
        .ingest(&mut media, &source, &settings)
        .await
        .expect("ingest");

    let unique_id = file.unique_id.expect("unique id");
    assert!(settings.media_dir().join(unique_id).exists());
}

#[tokio::test]
async fn test_youtube_url_goes_to_youtube() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let mut engines = vec![("local_files", json!({})), ("remote_urls", json!({}))];
    engines.extend(embed_engines());
    let (_repo, coordinator, mut media) = setup(&engines, "rickroll").await;

    let source = IngestSource::Url("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string());
    let file = coordinator
        .ingest(&mut media, &source, &settings)
        .await
        .expect("ingest");

    assert_eq!(file.engine_id, 3);
    assert_eq!(file.unique_id.as_deref(), Some("dQw4w9WgXcQ"));
    assert_eq!(file.container.as_deref(), Some("youtube"));
    assert!(media.encoded);

    let uris = coordinator.file_uris(&file, &settings).await.expect("uris");
    let web = uri::web_uri(&uris).expect("www uri");
    assert_eq!(web.file_uri, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    assert_eq!(uri::best_link_uri(&uris), Some(web));
    assert!(uri::download_uri(&uris).is_none());
}

#[tokio::test]
async fn test_other_urls_go_to_remote_urls() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let mut engines = vec![("remote_urls", json!({}))];
    engines.extend(embed_engines());
    let (_repo, coordinator, mut media) = setup(&engines, "mirror").await;

    let url = "https://cdn.example.org/clips/intro.webm";
    let file = coordinator
        .ingest(&mut media, &IngestSource::Url(url.to_string()), &settings)
        .await
        .expect("ingest");
    assert_eq!(file.engine_id, 1);
    assert_eq!(file.unique_id.as_deref(), Some(url));
    assert_eq!(file.display_name, "intro.webm");
    assert_eq!(file.container.as_deref(), Some("webm"));

    let rtmp = coordinator
        .ingest(
            &mut media,
            &IngestSource::Url("rtmp://stream.example.org/live/show".to_string()),
            &settings,
        )
        .await
        .expect("ingest rtmp");
    let uris = coordinator.file_uris(&rtmp, &settings).await.expect("uris");
    assert_eq!(uris.len(), 1);
    assert_eq!(uris[0].scheme, "rtmp");
    assert_eq!(uris[0].server_uri.as_deref(), Some("rtmp://stream.example.org/live"));
    assert_eq!(uris[0].file_uri, "show");
}

#[tokio::test]
async fn test_unknown_scheme_has_no_engine() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let (repo, coordinator, mut media) =
        setup(&[("remote_urls", json!({})), ("local_files", json!({}))], "ftp").await;

    let err = coordinator
        .ingest(
            &mut media,
            &IngestSource::Url("ftp://files.example.org/a.mp4".to_string()),
            &settings,
        )
        .await
        .expect_err("ftp is not handled");
    assert!(err.to_string().contains("Unusable file or URL provided"));
    assert_eq!(repo.file_count().await, 0);
}

#[tokio::test]
async fn test_malformed_instance_does_not_block_ingest_or_removal() {
    let dir = TempDir::new().expect("tempdir");
    let settings = test_settings(dir.path());
    let store_root = dir.path().join("store");
    let (repo, coordinator, mut media) =
        setup(&[("local_files", json!({"path": store_root}))], "keynote").await;
    let broken = repo
        .create_engine("media_folders", "Old folders", json!({"path": 5}))
        .await
        .expect("create engine");

    let upload = spool(&dir, "upload-4", b"video");
    let source = IngestSource::File(UploadedFile::new("Keynote.mp4", &upload));
    let file = coordinator
        .ingest(&mut media, &source, &settings)
        .await
        .expect("ingest skips the malformed instance");
    assert_eq!(file.engine_id, 1);
    // Uploads carry no title of their own.
    assert_eq!(media.title.as_deref(), Some("Keynote.mp4"));
    let stored = store_root.join(file.unique_id.as_deref().expect("unique id"));
    assert!(stored.exists());
    assert!(media.encoded);

    repo.set_engine_enabled(*broken.id(), false).await;
    let removed = coordinator
        .remove_file(file.id.expect("file id"), &settings)
        .await
        .expect("remove")
        .expect("file existed");

    assert_eq!(removed.id, file.id);
    assert!(!stored.exists());
    assert_eq!(repo.file_count().await, 0);
    let reloaded = repo.load_media(media.id.expect("media id")).await.expect("load media");
    assert!(!reloaded.encoded);
    assert_eq!(reloaded.title.as_deref(), Some("Keynote.mp4"));
}

//! Tests for URI selection policies.

use medialoom_core::{FileRecord, MediaKind, StorageUri, UriField};
use medialoom_storage::uri;
use std::path::PathBuf;
use std::sync::Arc;

fn file(id: i32, container: &str, size: Option<u64>) -> Arc<FileRecord> {
    let mut record = FileRecord::pending(1, 1, MediaKind::Video, format!("file {}", id))
        .with_id(id)
        .with_container(container)
        .with_unique_id(format!("{}.{}", id, container));
    record.size = size;
    Arc::new(record)
}

#[test]
fn test_best_link_prefers_download_then_http_then_www() {
    let small = file(1, "mp4", Some(10));
    let www = StorageUri::new(small.clone(), "www", "https://vimeo.com/1");
    let http = StorageUri::new(small.clone(), "http", "https://cdn.example.org/1.mp4");
    let download = StorageUri::new(small.clone(), "download", "https://dl.example.org/1.mp4");
    let rtmp = StorageUri::new(small, "rtmp", "1.mp4").with_server_uri("rtmp://stream.example.org/app");

    let all = vec![rtmp.clone(), www.clone(), http.clone(), download.clone()];
    assert_eq!(uri::best_link_uri(&all), Some(download));

    let no_download = vec![rtmp.clone(), www.clone(), http.clone()];
    assert_eq!(uri::best_link_uri(&no_download), Some(http));

    let only_www = vec![rtmp.clone(), www.clone()];
    assert_eq!(uri::best_link_uri(&only_www), Some(www));

    assert_eq!(uri::best_link_uri(std::slice::from_ref(&rtmp)), Some(rtmp));
    assert_eq!(uri::best_link_uri(&[]), None);
}

#[test]
fn test_download_prefers_largest_file() {
    let small = file(1, "mp4", Some(1_000));
    let large = file(2, "mp4", Some(5_000));
    let uris = vec![
        StorageUri::new(small, "http", "https://cdn.example.org/1.mp4"),
        StorageUri::new(large, "http", "https://cdn.example.org/2.mp4"),
    ];

    let picked = uri::download_uri(&uris).expect("download uri");
    assert_eq!(picked.file_uri, "https://cdn.example.org/2.mp4");
}

#[test]
fn test_download_scheme_beats_larger_http() {
    let small = file(1, "mp4", Some(1));
    let large = file(2, "mp4", Some(1_000_000));
    let uris = vec![
        StorageUri::new(large, "http", "https://cdn.example.org/2.mp4"),
        StorageUri::new(small, "download", "https://dl.example.org/1.mp4"),
    ];
    assert_eq!(uri::download_uri(&uris).map(|u| u.scheme), Some("download".to_string()));
}

#[test]
fn test_web_uri_only_matches_www() {
    let f = file(1, "youtube", None);
    let uris = vec![StorageUri::new(f, "youtube", "https://www.youtube.com/embed/abc")];
    assert!(uri::web_uri(&uris).is_none());
}

#[test]
fn test_filters_read_file_fields() {
    let mp4 = file(1, "mp4", Some(10));
    let webm = file(2, "webm", Some(20));
    let uris = vec![
        StorageUri::new(mp4.clone(), "http", "https://cdn.example.org/1.mp4"),
        StorageUri::new(webm.clone(), "http", "https://cdn.example.org/2.webm"),
        StorageUri::new(webm, "file", "file:///srv/media/2.webm"),
    ];

    let http_webm = uri::pick_uris(&uris, &[(UriField::Scheme, "http"), (UriField::Container, "webm")]);
    assert_eq!(http_webm.len(), 1);
    assert_eq!(http_webm[0].file_uri, "https://cdn.example.org/2.webm");

    let by_id = uri::pick_uri(&uris, &[(UriField::UniqueId, "1.mp4")]).expect("match");
    assert_eq!(by_id.file.id, Some(1));

    assert_eq!(uri::pick_uris(&uris, &[]).len(), 3);
    assert!(uri::pick_uri(&uris, &[(UriField::ServerUri, "rtmp://x")]).is_none());
}

#[test]
fn test_file_path_from_file_uri() {
    let f = file(1, "mp4", None);
    let uris = vec![
        StorageUri::new(f.clone(), "http", "https://cdn.example.org/1.mp4"),
        StorageUri::new(f, "file", "file:///srv/media/1.mp4"),
    ];
    assert_eq!(uri::file_path(&uris), Some(PathBuf::from("/srv/media/1.mp4")));
}

#[test]
fn test_display_joins_server_and_file() {
    let f = file(1, "flv", None);
    let rtmp = StorageUri::new(f.clone(), "rtmp", "/clip.flv").with_server_uri("rtmp://stream.example.org/app/");
    assert_eq!(rtmp.to_string(), "rtmp://stream.example.org/app/clip.flv");

    let http = StorageUri::new(f, "http", "https://cdn.example.org/clip.flv");
    assert_eq!(http.to_string(), "https://cdn.example.org/clip.flv");
}

//! Picking access points out of a file's URIs.
//!
//! # Examples
//!
//! ```
//! use medialoom_core::{FileRecord, MediaKind, StorageUri};
//! use medialoom_storage::uri;
//! use std::sync::Arc;
//!
//! let file = Arc::new(FileRecord::pending(1, 2, MediaKind::Video, "dQw4w9WgXcQ").with_container("youtube"));
//! let uris = vec![
//!     StorageUri::new(file.clone(), "youtube", "https://www.youtube.com/embed/dQw4w9WgXcQ"),
//!     StorageUri::new(file, "www", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
//! ];
//!
//! assert!(uri::download_uri(&uris).is_none());
//! assert_eq!(uri::best_link_uri(&uris).unwrap().scheme, "www");
//! ```

use medialoom_core::{StorageUri, UriField};
use std::cmp::Reverse;
use std::path::PathBuf;

/// URIs whose fields all equal the given values.
///
/// File-level fields such as `Container` are read from the owning file.
/// An empty filter returns every URI.
pub fn pick_uris(uris: &[StorageUri], filters: &[(UriField, &str)]) -> Vec<StorageUri> {
    uris.iter()
        .filter(|uri| {
            filters
                .iter()
                .all(|(field, value)| uri.field(*field).as_deref() == Some(*value))
        })
        .cloned()
        .collect()
}

/// First URI matching the filters.
pub fn pick_uri(uris: &[StorageUri], filters: &[(UriField, &str)]) -> Option<StorageUri> {
    uris.iter()
        .find(|uri| {
            filters
                .iter()
                .all(|(field, value)| uri.field(*field).as_deref() == Some(*value))
        })
        .cloned()
}

fn with_scheme(uris: &[StorageUri], scheme: &str) -> Option<StorageUri> {
    pick_uri(uris, &[(UriField::Scheme, scheme)])
}

/// Best URI for downloading: `download` scheme, else `http`, largest file first.
pub fn download_uri(uris: &[StorageUri]) -> Option<StorageUri> {
    let mut candidates = pick_uris(uris, &[(UriField::Scheme, "download")]);
    if candidates.is_empty() {
        candidates = pick_uris(uris, &[(UriField::Scheme, "http")]);
    }
    candidates.sort_by_key(|uri| Reverse(uri.file.size));
    candidates.into_iter().next()
}

/// Link to an embed in its original context (`www` scheme).
pub fn web_uri(uris: &[StorageUri]) -> Option<StorageUri> {
    with_scheme(uris, "www")
}

/// Best general purpose link: download, then http, then www, then anything.
pub fn best_link_uri(uris: &[StorageUri]) -> Option<StorageUri> {
    with_scheme(uris, "download")
        .or_else(|| with_scheme(uris, "http"))
        .or_else(|| with_scheme(uris, "www"))
        .or_else(|| uris.first().cloned())
}

/// Local filesystem path of the first `file` URI.
///
/// `file:///srv/media/1.mp4` yields `/srv/media/1.mp4`.
pub fn file_path(uris: &[StorageUri]) -> Option<PathBuf> {
    let uri = with_scheme(uris, "file")?;
    match url::Url::parse(&uri.file_uri) {
        Ok(parsed) => parsed.to_file_path().ok(),
        Err(_) => uri
            .file_uri
            .strip_prefix("file://")
            .map(PathBuf::from),
    }
}

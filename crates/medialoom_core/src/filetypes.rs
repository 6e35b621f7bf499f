//! Extension sniffing for uploaded media.
//!
//! # Examples
//!
//! ```
//! use medialoom_core::{filetypes, MediaKind};
//!
//! let container = filetypes::guess_container_format("OGG");
//! assert_eq!(container, Some("oga"));
//! assert_eq!(filetypes::guess_media_type(container), MediaKind::Audio);
//! assert_eq!(filetypes::guess_media_type(Some("mkv")), MediaKind::Video);
//! ```

use crate::MediaKind;

/// Extension to container format.
const CONTAINER_LOOKUP: &[(&str, &str)] = &[
    ("mp3", "mp3"),
    ("m4a", "m4a"),
    ("m4v", "m4v"),
    ("mp4", "mp4"),
    ("3gp", "3gp"),
    ("3g2", "3g2"),
    ("flv", "flv"),
    ("f4v", "f4v"),
    ("ogg", "oga"),
    ("oga", "oga"),
    ("ogv", "ogv"),
    ("webm", "webm"),
    ("mov", "mov"),
    ("avi", "avi"),
    ("wmv", "wmv"),
    ("wma", "wma"),
    ("wav", "wav"),
    ("flac", "flac"),
    ("mkv", "mkv"),
];

/// Containers that hold audio only.
pub const AUDIO_CONTAINERS: &[&str] = &["mp3", "m4a", "oga", "wma", "wav", "flac"];

/// Containers a browser or embedded player can play without transcoding.
pub const PLAYABLE_CONTAINERS: &[&str] = &[
    "mp3",
    "m4a",
    "m4v",
    "mp4",
    "flv",
    "f4v",
    "oga",
    "ogv",
    "webm",
    "youtube",
    "vimeo",
    "bliptv",
    "googlevideo",
];

/// Map a file extension (without the dot, any case) to a container format.
pub fn guess_container_format(extension: &str) -> Option<&'static str> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    CONTAINER_LOOKUP
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, container)| *container)
}

/// Guess whether a container holds audio or video. Unknown containers are video.
pub fn guess_media_type(container: Option<&str>) -> MediaKind {
    match container {
        Some(c) if AUDIO_CONTAINERS.contains(&c) => MediaKind::Audio,
        _ => MediaKind::Video,
    }
}

/// True if the container is directly playable on the web.
pub fn is_playable_container(container: &str) -> bool {
    PLAYABLE_CONTAINERS.contains(&container)
}

/// Split a filename into its stem and lowercased extension.
///
/// Only the final path component is considered. A name without a dot (or
/// whose only dot is leading) has an empty extension.
pub fn split_extension(filename: &str) -> (&str, String) {
    let base = basename(filename);
    match base.rfind('.') {
        Some(idx) if idx > 0 => (&base[..idx], base[idx + 1..].to_ascii_lowercase()),
        _ => (base, String::new()),
    }
}

/// Last path component of a filename, accepting both `/` and `\` separators.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_windows_paths() {
        assert_eq!(split_extension(r"C:\clips\Intro.MP4"), ("Intro", "mp4".to_string()));
        assert_eq!(split_extension(".hidden"), (".hidden", String::new()));
        assert_eq!(split_extension("noext"), ("noext", String::new()));
    }
}

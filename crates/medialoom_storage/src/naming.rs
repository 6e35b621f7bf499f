//! Safe on-disk names for stored files.

use medialoom_core::{FileRecord, filetypes};
use medialoom_error::{MedialoomResult, StorageError, StorageErrorKind};

/// Reduce a user-supplied filename to `[a-z0-9_-]`.
///
/// The extension is dropped, traversal fragments and path separators are
/// removed, and the rest is lowercased and filtered.
///
/// # Examples
///
/// ```
/// use medialoom_storage::sanitize_hint;
///
/// assert_eq!(sanitize_hint("../../etc/passwd"), "etcpasswd");
/// assert_eq!(sanitize_hint(r"C:\Videos\My Talk (final).MP4"), "cvideosmytalkfinal");
/// assert_eq!(sanitize_hint("..."), "");
/// ```
pub fn sanitize_hint(hint: &str) -> String {
    let (_, ext) = filetypes::split_extension(hint);
    let stem = if ext.is_empty() {
        hint
    } else {
        &hint[..hint.len() - ext.len() - 1]
    };
    stem.split(['/', '\\'])
        .filter(|part| *part != "." && *part != "..")
        .flat_map(str::chars)
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// `{id}[-{hint}][.{container}]` for a flushed file.
///
/// # Errors
///
/// Fails if the file has not been flushed and has no id.
///
/// # Examples
///
/// ```
/// use medialoom_core::{FileRecord, MediaKind};
/// use medialoom_storage::safe_file_name;
///
/// let file = FileRecord::pending(1, 1, MediaKind::Video, "x").with_id(42).with_container("mp4");
/// assert_eq!(safe_file_name(&file, Some("../../etc/passwd")).unwrap(), "42-etcpasswd.mp4");
/// assert_eq!(safe_file_name(&file, None).unwrap(), "42.mp4");
/// ```
pub fn safe_file_name(file: &FileRecord, hint: Option<&str>) -> MedialoomResult<String> {
    let id = file
        .id
        .ok_or_else(|| StorageError::new(StorageErrorKind::UnflushedFile))?;
    let mut name = id.to_string();

    let hint = hint.map(sanitize_hint).unwrap_or_default();
    if !hint.is_empty() {
        name.push('-');
        name.push_str(&hint);
    }
    if let Some(container) = file.container.as_deref().filter(|c| !c.is_empty()) {
        name.push('.');
        name.push_str(container);
    }
    Ok(name)
}

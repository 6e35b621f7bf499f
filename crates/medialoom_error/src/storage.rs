//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// No registered engine accepted the file or URL
    #[display("Unusable file or URL provided")]
    NoUsableEngine,
    /// The engine stored the file but neither parse nor store produced a unique id
    #[display("Engine {} returned no unique ID", _0)]
    MissingUniqueId(String),
    /// The media record has not been saved and has no primary key yet
    #[display("Media record has no identity yet")]
    UnsavedMedia,
    /// The file record has not been flushed and has no primary key yet
    #[display("File record has no identity yet")]
    UnflushedFile,
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Stored media not found at the specified location
    #[display("Media not found: {}", _0)]
    NotFound(String),
    /// Invalid storage path
    #[display("Invalid storage path: {}", _0)]
    InvalidPath(String),
    /// Remote backend rejected or failed the request
    #[display("Storage backend error: {}", _0)]
    Backend(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use medialoom_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("/srv/media/12.mp4".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Thumbnail pipeline error types.

/// Thumbnail error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ThumbnailErrorKind {
    /// The source image could not be decoded
    #[display("Failed to decode image: {}", _0)]
    Decode(String),
    /// The resized image could not be encoded
    #[display("Failed to encode thumbnail: {}", _0)]
    Encode(String),
    /// Filesystem failure while reading or writing thumbnails
    #[display("Thumbnail I/O error: {}", _0)]
    Io(String),
    /// No sizes are configured for the owner's category
    #[display("No thumbnail sizes configured for category '{}'", _0)]
    UnknownCategory(String),
    /// A placeholder thumbnail is missing
    #[display("Placeholder thumbnail missing: {}", _0)]
    MissingPlaceholder(String),
    /// Downloading a remote thumbnail failed
    #[display("Failed to fetch thumbnail: {}", _0)]
    Fetch(String),
}

/// Thumbnail error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Thumbnail Error: {} at line {} in {}", kind, line, file)]
pub struct ThumbnailError {
    /// The kind of error that occurred
    pub kind: ThumbnailErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ThumbnailError {
    /// Create a new ThumbnailError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ThumbnailErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

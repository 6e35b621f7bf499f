//! Top-level error wrapper types.

#[cfg(feature = "database")]
use crate::DatabaseError;
use crate::{
    CannotTranscodeError, ConfigError, EngineError, HttpError, StorageError, ThumbnailError,
    UnsuitableEngineError,
};

/// Every error condition the Medialoom crates can surface.
///
/// # Examples
///
/// ```
/// use medialoom_error::{HttpError, MedialoomError};
///
/// let http_err = HttpError::new("Connection refused");
/// let err: MedialoomError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MedialoomErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Engine registry or ordering error
    #[from(EngineError)]
    Engine(EngineError),
    /// An engine declined to parse its input
    #[from(UnsuitableEngineError)]
    Unsuitable(UnsuitableEngineError),
    /// An engine declined to transcode a file
    #[from(CannotTranscodeError)]
    CannotTranscode(CannotTranscodeError),
    /// Thumbnail pipeline error
    #[from(ThumbnailError)]
    Thumbnail(ThumbnailError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Medialoom error with kind discrimination.
///
/// # Examples
///
/// ```
/// use medialoom_error::{MedialoomResult, UnsuitableEngineError};
///
/// fn parse() -> MedialoomResult<()> {
///     Err(UnsuitableEngineError::new("not a YouTube URL"))?
/// }
///
/// let err = parse().unwrap_err();
/// assert!(err.is_unsuitable());
/// assert!(!err.is_cannot_transcode());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Medialoom Error: {}", _0)]
pub struct MedialoomError(Box<MedialoomErrorKind>);

impl MedialoomError {
    /// Create a new error from a kind.
    pub fn new(kind: MedialoomErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MedialoomErrorKind {
        &self.0
    }

    /// True when an engine declined to parse the input.
    pub fn is_unsuitable(&self) -> bool {
        matches!(self.kind(), MedialoomErrorKind::Unsuitable(_))
    }

    /// True when an engine declined to transcode a file.
    pub fn is_cannot_transcode(&self) -> bool {
        matches!(self.kind(), MedialoomErrorKind::CannotTranscode(_))
    }
}

// Generic From implementation for any type that converts to MedialoomErrorKind
impl<T> From<T> for MedialoomError
where
    T: Into<MedialoomErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Medialoom operations.
pub type MedialoomResult<T> = std::result::Result<T, MedialoomError>;

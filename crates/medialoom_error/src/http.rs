//! HTTP error types.

/// A failed outbound request, such as an oEmbed lookup or a remote
/// thumbnail download.
///
/// # Examples
///
/// ```
/// use medialoom_error::{HttpError, MedialoomError};
///
/// let err = HttpError::for_url(
///     "https://www.youtube.com/oembed",
///     "operation timed out",
/// );
/// assert_eq!(err.url.as_deref(), Some("https://www.youtube.com/oembed"));
/// assert!(err.to_string().contains("youtube.com/oembed: operation timed out"));
///
/// let err: MedialoomError = err.into();
/// assert!(err.to_string().contains("HTTP Error"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// Request target, when known
    pub url: Option<String>,
    /// What went wrong, prefixed with the target when known
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create an HttpError with no request target.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            url: None,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an HttpError for a request to `url`.
    #[track_caller]
    pub fn for_url(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let url = url.into();
        let mut err = Self::new(format!("{}: {}", url, reason));
        err.url = Some(url);
        err
    }
}

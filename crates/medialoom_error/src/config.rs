//! Configuration error types.

/// A configuration file, section or command-line value was rejected.
///
/// Raised while layering `medialoom.toml` files and while checking values
/// such as `jpeg_quality` or inline engine data.
///
/// # Examples
///
/// ```
/// use medialoom_error::{ConfigError, MedialoomError, MedialoomErrorKind};
///
/// let err = ConfigError::new("jpeg_quality must be between 1 and 100, got 0");
/// assert!(err.to_string().starts_with("Configuration Error: jpeg_quality"));
///
/// let err: MedialoomError = err.into();
/// assert!(matches!(err.kind(), MedialoomErrorKind::Config(_)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Which setting was rejected and why
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a ConfigError at the caller's location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

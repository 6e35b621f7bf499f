//! Engine registry and ordering errors.

/// Engine registry error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum EngineErrorKind {
    /// The try-before/try-after declarations form a cycle
    #[display("Circular dependency detected among engine types: {}", _0.join(", "))]
    CircularDependency(Vec<String>),
    /// No descriptor is registered for this engine type
    #[display("Unknown engine type: {}", _0)]
    UnknownEngineType(String),
    /// A descriptor with this engine type is already registered
    #[display("Engine type already registered: {}", _0)]
    DuplicateEngineType(String),
    /// Another engine instance already uses this display name
    #[display("Engine display name already in use: {}", _0)]
    DuplicateDisplayName(String),
    /// A singleton engine type already has an instance
    #[display("Engine type {} allows only one instance", _0)]
    SingletonViolation(String),
    /// Instance data could not be interpreted by the engine
    #[display("Invalid settings for engine {}: {}", engine, reason)]
    InvalidSettings {
        /// The engine type tag
        engine: String,
        /// Why the settings were rejected
        reason: String,
    },
}

/// Engine error with location tracking.
///
/// # Examples
///
/// ```
/// use medialoom_error::{EngineError, EngineErrorKind};
///
/// let err = EngineError::new(EngineErrorKind::CircularDependency(vec![
///     "vimeo".to_string(),
///     "youtube".to_string(),
/// ]));
/// assert!(format!("{}", err).contains("vimeo, youtube"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Engine Error: {} at line {} in {}", kind, line, file)]
pub struct EngineError {
    kind: EngineErrorKind,
    line: u32,
    file: &'static str,
}

impl EngineError {
    /// Create a new engine error with caller location tracking.
    #[track_caller]
    pub fn new(kind: EngineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &EngineErrorKind {
        &self.kind
    }
}

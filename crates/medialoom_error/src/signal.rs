//! Non-fatal engine signals.
//!
//! These are raised by engines to say "not mine" rather than "something broke".

/// An engine cannot or will not parse the given file or URL.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Unsuitable engine: {} at line {} in {}", reason, line, file)]
pub struct UnsuitableEngineError {
    /// Why the engine declined
    pub reason: String,
    /// Line number where the signal was raised
    pub line: u32,
    /// File where the signal was raised
    pub file: &'static str,
}

impl UnsuitableEngineError {
    /// Create a new unsuitable-engine signal at the current location.
    #[track_caller]
    pub fn new(reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

/// An engine cannot or will not transcode the given file.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Cannot transcode: {} at line {} in {}", reason, line, file)]
pub struct CannotTranscodeError {
    /// Why the engine declined
    pub reason: String,
    /// Line number where the signal was raised
    pub line: u32,
    /// File where the signal was raised
    pub file: &'static str,
}

impl CannotTranscodeError {
    /// Create a new cannot-transcode signal at the current location.
    #[track_caller]
    pub fn new(reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

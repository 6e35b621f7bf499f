//! Error types for the Medialoom media publishing core.
//!
//! This crate provides the foundation error types used throughout the Medialoom workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Two errors are *signals* rather than failures: [`UnsuitableEngineError`]
//! (an engine declined to parse an input) and [`CannotTranscodeError`]
//! (an engine declined to transcode a file). Callers that walk an engine
//! list test for them with [`MedialoomError::is_unsuitable`] and
//! [`MedialoomError::is_cannot_transcode`].
//!
//! # Examples
//!
//! ```
//! use medialoom_error::{MedialoomResult, StorageError, StorageErrorKind};
//!
//! fn pick_engine() -> MedialoomResult<String> {
//!     Err(StorageError::new(StorageErrorKind::NoUsableEngine))?
//! }
//!
//! match pick_engine() {
//!     Ok(engine) => println!("Using {}", engine),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
#[cfg(feature = "database")]
mod database;
mod engine;
mod error;
mod http;
mod signal;
mod storage;
mod thumbnail;

pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use engine::{EngineError, EngineErrorKind};
pub use error::{MedialoomError, MedialoomErrorKind, MedialoomResult};
pub use http::HttpError;
pub use signal::{CannotTranscodeError, UnsuitableEngineError};
pub use storage::{StorageError, StorageErrorKind};
pub use thumbnail::{ThumbnailError, ThumbnailErrorKind};

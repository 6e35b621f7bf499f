//! Medialoom - media publishing core
//!
//! Medialoom accepts an uploaded file or a pasted URL for a media item,
//! decides which storage engine owns it, extracts metadata, persists the
//! file, generates thumbnails and offers the result for transcoding.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use medialoom::{
//!     EngineRegistry, IngestSource, MedialoomConfig, PostgresMediaRepository,
//!     StorageCoordinator, MediaRepository,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = MedialoomConfig::load()?.ingest_settings()?;
//!     let repo = Arc::new(PostgresMediaRepository::connect()?);
//!     let coordinator =
//!         StorageCoordinator::new(Arc::new(EngineRegistry::with_builtin_engines()?), repo.clone());
//!
//!     let mut media = repo.load_media(1).await?;
//!     let source = IngestSource::Url("https://www.youtube.com/watch?v=dQw4w9WgXcQ".into());
//!     let file = coordinator.ingest(&mut media, &source, &settings).await?;
//!     println!("Stored: {:?}", file.unique_id);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `database` - PostgreSQL persistence and the `medialoom` binary
//! - `s3` - Amazon S3 storage engine
//! - `all` - Enable all features
//!
//! # Architecture
//!
//! - `medialoom_error` - Error types
//! - `medialoom_core` - Data model and settings snapshot
//! - `medialoom_interface` - Repository traits and the in-memory repository
//! - `medialoom_thumbnails` - Thumbnail pipeline
//! - `medialoom_storage` - Engines, ordering and the ingest coordinator
//! - `medialoom_database` - PostgreSQL integration
//!
//! This crate (`medialoom`) re-exports everything for convenience and adds
//! layered configuration loading.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;

pub use config::{MedialoomConfig, StorageConfig, ThumbnailConfig};

// Re-export core crates (always available)
pub use medialoom_core::*;
pub use medialoom_error::*;
pub use medialoom_interface::*;
pub use medialoom_storage::*;
pub use medialoom_thumbnails::*;

// Re-export optional crates based on features
#[cfg(feature = "database")]
pub use medialoom_database::*;

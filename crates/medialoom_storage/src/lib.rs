//! Pluggable storage-engine pipeline for the Medialoom media publishing core.
//!
//! Given an uploaded file or a pasted URL, the pipeline decides which storage
//! engine owns it, extracts metadata, persists the file, generates
//! thumbnails and offers the result for transcoding.
//!
//! # Pieces
//!
//! - [`StorageEngine`]: one configured backend (local disk, S3, YouTube, ...)
//! - [`EngineDescriptor`] / [`EngineRegistry`]: engine types, their ordering
//!   constraints and how to build them from stored instances
//! - [`sort_engines`]: deterministic layered topological order
//! - [`StorageCoordinator`]: the ingest flow plus file/media deletion
//! - [`uri`]: picking access points for playback, download and linking
//!
//! # Example
//!
//! ```rust,no_run
//! use medialoom_core::{IngestSettings, IngestSource, ThumbnailSettings, UploadedFile};
//! use medialoom_interface::{InMemoryMediaRepository, MediaRepository};
//! use medialoom_storage::{EngineRegistry, StorageCoordinator};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Arc::new(InMemoryMediaRepository::new());
//! repo.create_engine("local_files", "Local Files", serde_json::json!({"path": "/srv/media"}))
//!     .await?;
//!
//! let settings = IngestSettings::builder()
//!     .media_dir("/srv/media")
//!     .thumbnails(ThumbnailSettings::builder().image_dir("/srv/images").build()?)
//!     .build()?;
//!
//! let coordinator = StorageCoordinator::new(Arc::new(EngineRegistry::with_builtin_engines()?), repo.clone());
//! let mut media = repo.load_media(1).await?;
//! let source = IngestSource::File(UploadedFile::new("talk.mp4", "/tmp/upload-1"));
//! let file = coordinator.ingest(&mut media, &source, &settings).await?;
//! println!("stored {:?}", file.unique_id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod coordinator;
mod descriptor;
mod engine;
pub mod engines;
mod naming;
mod registry;
mod sort;
pub mod uri;

pub use coordinator::StorageCoordinator;
pub use descriptor::{EngineDescriptor, EngineFactory};
pub use engine::{EngineContext, StorageEngine};
pub use naming::{safe_file_name, sanitize_hint};
pub use registry::{EngineConstraints, EngineRegistry};
pub use sort::{layered_sort, sort_engines, sort_instances};

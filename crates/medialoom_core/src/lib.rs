//! Core data types for the Medialoom media publishing core.
//!
//! This crate provides the data model shared by every Medialoom crate: media
//! and file records, configured engine instances, parser metadata, storage
//! URIs, file-type sniffing and the settings snapshot handed to each ingest.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
pub mod filetypes;
mod media;
mod metadata;
mod settings;
mod source;
mod uri;

pub use engine::EngineInstance;
pub use media::{Category, FileRecord, FileState, MediaKind, MediaRecord, PodcastRecord};
pub use metadata::{FileMetadata, ThumbnailSource};
pub use settings::{
    IngestSettings, IngestSettingsBuilder, ThumbnailSettings, ThumbnailSettingsBuilder,
    ThumbnailSizes,
};
pub use source::{IngestSource, UploadedFile};
pub use uri::{StorageUri, UriField};

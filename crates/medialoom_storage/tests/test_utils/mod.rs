//! Test utilities for storage pipeline tests.
//!
//! This module provides a scriptable mock engine and settings helpers.

#![allow(dead_code)]

pub mod mock_engine;

#[allow(unused_imports)]
pub use mock_engine::{MockCalls, MockConfig, MockEngine, mock_descriptor};

use medialoom_core::{EngineInstance, IngestSettings, ThumbnailSettings};
use std::path::Path;

/// Settings rooted in a temporary directory with one small media thumbnail size.
pub fn test_settings(root: &Path) -> IngestSettings {
    let thumbnails = ThumbnailSettings::builder()
        .image_dir(root.join("images"))
        .size("media", "s", (32, 18))
        .size("media", "l", (64, 36))
        .build()
        .expect("Failed to build thumbnail settings");
    IngestSettings::builder()
        .media_dir(root.join("media"))
        .thumbnails(thumbnails)
        .build()
        .expect("Failed to build ingest settings")
}

/// An enabled instance with empty data.
pub fn instance(id: i32, engine_type: &str) -> EngineInstance {
    EngineInstance::new(
        id,
        engine_type,
        format!("{} #{}", engine_type, id),
        serde_json::json!({}),
    )
}

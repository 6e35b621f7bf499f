//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the medialoom binary.

mod commands;
mod engines;
mod media;

pub use commands::{Cli, Commands, ThumbCommands};
pub use engines::handle_engine_command;
pub use media::{delete_media, ingest, new_media, print_uris, remove_file, thumb_defaults};

use medialoom::{
    EngineRegistry, IngestSettings, MedialoomConfig, MedialoomResult, PostgresMediaRepository,
    StorageCoordinator,
};
use std::path::Path;
use std::sync::Arc;

/// Everything a command handler needs.
pub struct CliContext {
    /// Settings snapshot from the loaded configuration
    pub settings: IngestSettings,
    /// PostgreSQL-backed repository
    pub repository: Arc<PostgresMediaRepository>,
    /// Ingest coordinator over the built-in engines
    pub coordinator: StorageCoordinator,
}

impl CliContext {
    /// Load configuration and connect to the database.
    pub fn connect(config_path: Option<&Path>) -> MedialoomResult<Self> {
        let config = match config_path {
            Some(path) => MedialoomConfig::from_file(path)?,
            None => MedialoomConfig::load()?,
        };
        let settings = config.ingest_settings()?;
        let repository = Arc::new(PostgresMediaRepository::connect()?);
        let registry = Arc::new(EngineRegistry::with_builtin_engines()?);
        let coordinator = StorageCoordinator::new(registry, repository.clone());
        Ok(Self {
            settings,
            repository,
            coordinator,
        })
    }
}

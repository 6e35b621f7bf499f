//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Medialoom - media publishing core with pluggable storage engines
#[derive(Parser, Debug)]
#[command(name = "medialoom")]
#[command(about = "Media publishing core with pluggable storage engines", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read configuration from this file instead of the layered defaults
    #[arg(long, global = true, env = "MEDIALOOM_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty media item to ingest files into
    NewMedia {
        /// Unique URL slug
        slug: String,

        /// Title
        #[arg(long)]
        title: Option<String>,
    },

    /// Store an uploaded file or a URL as a new file of a media item
    Ingest {
        /// ID of the media item
        media_id: i32,

        /// Path of a local file to ingest
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        file: Option<PathBuf>,

        /// Filename to report for the upload (defaults to the file's name)
        #[arg(long, requires = "file")]
        name: Option<String>,

        /// URL to ingest
        #[arg(long)]
        url: Option<String>,
    },

    /// Storage engine management
    #[command(subcommand)]
    Engines(EngineCommands),

    /// Delete one file and its stored data
    RemoveFile {
        /// ID of the file
        file_id: i32,
    },

    /// Delete a media item with all its files and thumbnails
    DeleteMedia {
        /// ID of the media item
        media_id: i32,
    },

    /// List the access points of a media item's files
    Uris {
        /// ID of the media item
        media_id: i32,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Thumbnail management
    #[command(subcommand)]
    Thumbs(ThumbCommands),

    /// Run pending database migrations
    Migrate,
}

/// Storage engine subcommands
#[derive(Subcommand, Debug)]
pub enum EngineCommands {
    /// List configured engine instances
    List {
        /// Only show enabled instances
        #[arg(long)]
        enabled_only: bool,
    },

    /// Show the order in which enabled engines are offered new files
    Order,

    /// Add an engine instance
    Add {
        /// Engine type tag, e.g. `local_files`
        engine_type: String,

        /// Display name (defaults to the engine type's default name)
        #[arg(long)]
        name: Option<String>,

        /// Engine configuration as a JSON object (defaults to the type's template)
        #[arg(long)]
        data: Option<String>,
    },
}

/// Thumbnail subcommands
#[derive(Subcommand, Debug)]
pub enum ThumbCommands {
    /// Copy the placeholder thumbnail set to a media item
    Defaults {
        /// ID of the media item
        media_id: i32,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

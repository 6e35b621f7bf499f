//! PostgreSQL persistence for the Medialoom media publishing core.
//!
//! This crate provides the Diesel schema, row models, embedded migrations
//! and a [`MediaRepository`](medialoom_interface::MediaRepository)
//! implementation backed by PostgreSQL.
//!
//! # Features
//!
//! - Diesel-based PostgreSQL integration
//! - Embedded migrations
//! - Transactions that stay open across an engine's async `store` call
//!
//! # Example
//!
//! ```rust,no_run
//! use medialoom_database::{PostgresMediaRepository, establish_connection, run_migrations};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = establish_connection()?;
//! run_migrations(&mut conn)?;
//! let repo = PostgresMediaRepository::new(conn);
//! # Ok(())
//! # }
//! ```

mod connection;
mod conversions;
mod models;
mod repository;

// Public modules for external access
pub mod schema;

pub use connection::{DATABASE_URL_VAR, connect_to, establish_connection, run_migrations};
pub use conversions::{engine_from_row, file_from_row, file_values, media_from_rows, media_values};
pub use models::{CategoryRow, EngineRow, FileRow, FileValues, MediaRow, MediaValues, NewEngineRow};
pub use repository::PostgresMediaRepository;

use medialoom_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

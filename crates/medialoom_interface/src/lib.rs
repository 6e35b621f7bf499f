//! Persistence contract for the Medialoom media publishing core.
//!
//! The storage pipeline never talks to a database directly. It goes through
//! [`MediaRepository`], which hands out [`RepositoryTransaction`]s for the
//! flush/store/commit window of an ingest. [`InMemoryMediaRepository`] backs
//! tests and demos; the `medialoom_database` crate provides PostgreSQL.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod in_memory;
mod repository;

pub use in_memory::InMemoryMediaRepository;
pub use repository::{MediaRepository, RepositoryTransaction};

//! Connecting and migrating.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use medialoom_error::{DatabaseError, DatabaseErrorKind};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Environment variable holding the PostgreSQL connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Connect to the database named by `DATABASE_URL`.
///
/// Callers that keep the URL in a `.env` file load it first (the CLI does
/// this with `dotenvy`).
pub fn establish_connection() -> DatabaseResult<PgConnection> {
    let database_url = std::env::var(DATABASE_URL_VAR).map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(format!(
            "{} is not set",
            DATABASE_URL_VAR
        )))
    })?;
    connect_to(&database_url)
}

/// Connect to an explicit PostgreSQL URL.
pub fn connect_to(database_url: &str) -> DatabaseResult<PgConnection> {
    let conn = PgConnection::establish(database_url)?;
    tracing::debug!("Connected to PostgreSQL");
    Ok(conn)
}

/// Apply every pending embedded migration, returning how many ran.
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<usize> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
    for version in &applied {
        tracing::debug!(%version, "Applied migration");
    }
    tracing::info!(applied = applied.len(), "Database schema up to date");
    Ok(applied.len())
}

//! PostgreSQL implementation of MediaRepository.

use crate::conversions::{engine_from_row, file_from_row, file_values, media_from_rows, media_values};
use crate::models::{CategoryRow, EngineRow, FileRow, MediaRow, NewEngineRow};
use crate::schema::{categories, media, media_categories, media_files, storage};
use crate::{DatabaseResult, establish_connection};

use async_trait::async_trait;
use chrono::Utc;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind as DieselErrorKind, Error as DieselError};
use medialoom_core::{EngineInstance, FileRecord, MediaRecord};
use medialoom_error::{
    DatabaseError, DatabaseErrorKind, EngineError, EngineErrorKind, MedialoomError, MedialoomResult,
    StorageError, StorageErrorKind,
};
use medialoom_interface::{MediaRepository, RepositoryTransaction};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// PostgreSQL implementation of MediaRepository using Diesel ORM.
///
/// Media live in `media`, their files in `media_files`, engine instances in
/// `storage` and category tags in `categories` / `media_categories`.
///
/// # Example
/// ```no_run
/// use medialoom_database::{PostgresMediaRepository, establish_connection, run_migrations};
/// use medialoom_interface::MediaRepository;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut conn = establish_connection()?;
///     run_migrations(&mut conn)?;
///     let repo = PostgresMediaRepository::new(conn);
///     for engine in repo.list_engines(true).await? {
///         println!("{} ({})", engine.display_name(), engine.engine_type());
///     }
///     Ok(())
/// }
/// ```
pub struct PostgresMediaRepository {
    /// Database connection wrapped in Arc<Mutex> for async safety.
    ///
    /// An open [`RepositoryTransaction`] holds the lock until it commits or
    /// rolls back.
    conn: Arc<Mutex<PgConnection>>,
}

impl PostgresMediaRepository {
    /// Create a new PostgreSQL media repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// Connect using `DATABASE_URL`.
    pub fn connect() -> MedialoomResult<Self> {
        Ok(Self::new(establish_connection()?))
    }

    /// Insert a media record without files, returning its id.
    pub async fn insert_media(&self, record: &MediaRecord) -> MedialoomResult<i32> {
        let mut conn = self.conn.lock().await;
        let values = media_values(record)?;
        let id = diesel::insert_into(media::table)
            .values(&values)
            .returning(media::id)
            .get_result::<i32>(&mut *conn)
            .map_err(DatabaseError::from)?;
        tracing::debug!(media_id = id, slug = %record.slug, "Inserted media");
        Ok(id)
    }
}

/// Load a media row with its files and categories, `None` if it does not exist.
fn load_media_rows(conn: &mut PgConnection, media_id: i32) -> DatabaseResult<Option<MediaRecord>> {
    let Some(row) = media::table
        .find(media_id)
        .select(MediaRow::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let files: Vec<FileRow> = FileRow::belonging_to(&row)
        .select(FileRow::as_select())
        .order(media_files::id.asc())
        .load(conn)?;

    let tags: Vec<CategoryRow> = media_categories::table
        .inner_join(categories::table)
        .filter(media_categories::media_id.eq(media_id))
        .select(CategoryRow::as_select())
        .order(categories::name.asc())
        .load(conn)?;

    media_from_rows(row, files, tags).map(Some)
}

#[async_trait]
impl MediaRepository for PostgresMediaRepository {
    async fn list_engines(&self, enabled_only: bool) -> MedialoomResult<Vec<EngineInstance>> {
        let mut conn = self.conn.lock().await;
        let mut query = storage::table.select(EngineRow::as_select()).into_boxed();
        if enabled_only {
            query = query.filter(storage::enabled.eq(true));
        }
        let rows = query
            .order(storage::id.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(rows.into_iter().map(engine_from_row).collect())
    }

    #[tracing::instrument(skip(self, data))]
    async fn create_engine(
        &self,
        engine_type: &str,
        display_name: &str,
        data: serde_json::Value,
    ) -> MedialoomResult<EngineInstance> {
        let mut conn = self.conn.lock().await;
        let new_row = NewEngineRow {
            engine_type: engine_type.to_string(),
            display_name: display_name.to_string(),
            enabled: true,
            data,
        };
        let row: EngineRow = diesel::insert_into(storage::table)
            .values(&new_row)
            .returning(EngineRow::as_returning())
            .get_result(&mut *conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DieselErrorKind::UniqueViolation, _) => {
                    MedialoomError::from(EngineError::new(EngineErrorKind::DuplicateDisplayName(
                        display_name.to_string(),
                    )))
                }
                other => MedialoomError::from(DatabaseError::from(other)),
            })?;
        tracing::info!(engine_id = row.id, "Created engine instance");
        Ok(engine_from_row(row))
    }

    async fn update_engine_data(
        &self,
        engine_id: i32,
        data: serde_json::Value,
    ) -> MedialoomResult<()> {
        let mut conn = self.conn.lock().await;
        let updated = diesel::update(storage::table.find(engine_id))
            .set((storage::data.eq(data), storage::modified_on.eq(Utc::now())))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        if updated == 0 {
            return Err(
                StorageError::new(StorageErrorKind::NotFound(format!("engine {}", engine_id)))
                    .into(),
            );
        }
        Ok(())
    }

    async fn load_media(&self, media_id: i32) -> MedialoomResult<MediaRecord> {
        let mut conn = self.conn.lock().await;
        load_media_rows(&mut conn, media_id)?.ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound(format!("media {}", media_id))).into()
        })
    }

    async fn begin(&self) -> MedialoomResult<Box<dyn RepositoryTransaction>> {
        let mut conn = self.conn.clone().lock_owned().await;
        <AnsiTransactionManager as TransactionManager<PgConnection>>::begin_transaction(&mut *conn)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Transaction(e.to_string())))?;
        tracing::debug!("Began transaction");
        Ok(Box::new(PostgresTransaction { conn: Some(conn) }))
    }

    async fn delete_file(&self, file_id: i32) -> MedialoomResult<Option<FileRecord>> {
        let mut conn = self.conn.lock().await;
        let row: Option<FileRow> = diesel::delete(media_files::table.find(file_id))
            .returning(FileRow::as_returning())
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(row.map(file_from_row).transpose()?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_media(&self, media_id: i32) -> MedialoomResult<Option<MediaRecord>> {
        let mut conn = self.conn.lock().await;
        let deleted = conn.transaction::<_, DatabaseError, _>(|conn| {
            let Some(record) = load_media_rows(conn, media_id)? else {
                return Ok(None);
            };
            diesel::delete(media_categories::table.filter(media_categories::media_id.eq(media_id)))
                .execute(conn)?;
            diesel::delete(media_files::table.filter(media_files::media_id.eq(media_id)))
                .execute(conn)?;
            diesel::delete(media::table.find(media_id)).execute(conn)?;
            Ok(Some(record))
        })?;
        Ok(deleted)
    }
}

/// A transaction holding the repository's connection.
///
/// Dropped without [`commit`](RepositoryTransaction::commit), it rolls back.
struct PostgresTransaction {
    conn: Option<OwnedMutexGuard<PgConnection>>,
}

impl PostgresTransaction {
    fn conn(&mut self) -> MedialoomResult<&mut PgConnection> {
        self.conn.as_deref_mut().ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::Transaction(
                "transaction already finished".to_string(),
            ))
            .into()
        })
    }
}

#[async_trait]
impl RepositoryTransaction for PostgresTransaction {
    async fn flush_file(&mut self, file: &mut FileRecord) -> MedialoomResult<()> {
        file.modified_on = Utc::now();
        let values = file_values(file)?;
        let conn = self.conn()?;
        match file.id {
            Some(id) => {
                diesel::update(media_files::table.find(id))
                    .set(&values)
                    .execute(conn)
                    .map_err(DatabaseError::from)?;
            }
            None => {
                let id = diesel::insert_into(media_files::table)
                    .values(&values)
                    .returning(media_files::id)
                    .get_result::<i32>(conn)
                    .map_err(DatabaseError::from)?;
                file.id = Some(id);
            }
        }
        Ok(())
    }

    async fn update_media(&mut self, record: &MediaRecord) -> MedialoomResult<()> {
        let id = record
            .id
            .ok_or_else(|| StorageError::new(StorageErrorKind::UnsavedMedia))?;
        let mut values = media_values(record)?;
        values.modified_on = Utc::now();
        let conn = self.conn()?;
        let updated = diesel::update(media::table.find(id))
            .set(&values)
            .execute(conn)
            .map_err(DatabaseError::from)?;
        if updated == 0 {
            return Err(StorageError::new(StorageErrorKind::NotFound(format!("media {}", id))).into());
        }
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> MedialoomResult<()> {
        let mut conn = self.conn.take().ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::Transaction(
                "transaction already finished".to_string(),
            ))
        })?;
        <AnsiTransactionManager as TransactionManager<PgConnection>>::commit_transaction(&mut *conn)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Transaction(e.to_string())))?;
        tracing::debug!("Committed transaction");
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> MedialoomResult<()> {
        let Some(mut conn) = self.conn.take() else {
            return Ok(());
        };
        <AnsiTransactionManager as TransactionManager<PgConnection>>::rollback_transaction(&mut *conn)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Transaction(e.to_string())))?;
        tracing::debug!("Rolled back transaction");
        Ok(())
    }
}

impl Drop for PostgresTransaction {
    fn drop(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            match <AnsiTransactionManager as TransactionManager<PgConnection>>::rollback_transaction(
                &mut *conn,
            ) {
                Ok(()) => tracing::warn!("Rolled back unfinished transaction"),
                Err(e) => tracing::warn!(error = %e, "Failed to roll back unfinished transaction"),
            }
        }
    }
}

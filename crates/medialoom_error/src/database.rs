//! Database error types.

use diesel::result::{DatabaseErrorKind as DieselErrorKind, Error as DieselError};

/// Database error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// Could not reach the database
    #[display("Database connection error: {}", _0)]
    Connection(String),
    /// A statement failed
    #[display("Database query error: {}", _0)]
    Query(String),
    /// A unique, foreign-key or check constraint rejected a write
    #[display("Constraint violated: {}", _0)]
    Constraint(String),
    /// A transaction could not be opened, committed or rolled back
    #[display("Database transaction error: {}", _0)]
    Transaction(String),
    /// A stored value does not map onto the domain model
    #[display("Row conversion error: {}", _0)]
    Serialization(String),
    /// Applying embedded migrations failed
    #[display("Migration error: {}", _0)]
    Migration(String),
    /// The requested row does not exist
    #[display("Record not found")]
    NotFound,
}

/// Database error with source location tracking.
///
/// # Examples
///
/// ```
/// use medialoom_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::Constraint("media_slug_key".into()));
/// assert!(format!("{}", err).contains("media_slug_key"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// The kind of error that occurred
    pub kind: DatabaseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DatabaseError {
    /// Create a new DatabaseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<DieselError> for DatabaseError {
    #[track_caller]
    fn from(err: DieselError) -> Self {
        let kind = match &err {
            DieselError::NotFound => DatabaseErrorKind::NotFound,
            DieselError::DatabaseError(
                DieselErrorKind::UniqueViolation
                | DieselErrorKind::ForeignKeyViolation
                | DieselErrorKind::CheckViolation
                | DieselErrorKind::NotNullViolation,
                info,
            ) => DatabaseErrorKind::Constraint(
                info.constraint_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| info.message().to_string()),
            ),
            DieselError::AlreadyInTransaction
            | DieselError::NotInTransaction
            | DieselError::RollbackTransaction
            | DieselError::RollbackErrorOnCommit { .. }
            | DieselError::BrokenTransactionManager => {
                DatabaseErrorKind::Transaction(err.to_string())
            }
            DieselError::SerializationError(_) | DieselError::DeserializationError(_) => {
                DatabaseErrorKind::Serialization(err.to_string())
            }
            _ => DatabaseErrorKind::Query(err.to_string()),
        };
        DatabaseError::new(kind)
    }
}

impl From<diesel::ConnectionError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Connection(err.to_string()))
    }
}

impl From<serde_json::Error> for DatabaseError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::new(DatabaseErrorKind::Serialization(err.to_string()))
    }
}

use sqlx::error::ErrorKind;
use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("access to this resource is forbidden")]
    Forbidden,
}

impl DatabaseError {
    fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::SqlxError(sqlx::Error::Database(e)) => Some(e.kind()),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self.kind(), Some(ErrorKind::UniqueViolation))
    }

    /// Referenced parent row does not exist.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self.kind(), Some(ErrorKind::ForeignKeyViolation))
    }

    /// A CHECK or NOT NULL constraint rejected the row.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self.kind(),
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation)
        )
    }
}

/// Builds a `DatabaseError` carrying the given constraint kind without a server.
#[cfg(test)]
pub(crate) fn database_error_of_kind(kind: ErrorKind) -> DatabaseError {
    #[derive(Debug)]
    struct KindError(ErrorKind);

    impl std::fmt::Display for KindError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    impl std::error::Error for KindError {}

    impl sqlx::error::DatabaseError for KindError {
        fn message(&self) -> &str {
            "constraint failed"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                ErrorKind::NotNullViolation => ErrorKind::NotNullViolation,
                ErrorKind::CheckViolation => ErrorKind::CheckViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    DatabaseError::SqlxError(sqlx::Error::Database(Box::new(KindError(kind))))
}

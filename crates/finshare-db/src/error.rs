//! Database-specific error types and conversions.

use finshare_core::error::FinshareError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Stored record is malformed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique index violation: {entity}")]
    Conflict { entity: String },
}

impl DbError {
    /// Classify a SurrealDB write error, surfacing unique-index
    /// violations as `Conflict` instead of a generic database error.
    pub fn from_write(entity: &str, err: surrealdb::Error) -> Self {
        if err.to_string().contains("already contains") {
            DbError::Conflict {
                entity: entity.into(),
            }
        } else {
            DbError::Surreal(err)
        }
    }
}

impl From<DbError> for FinshareError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FinshareError::NotFound { entity, id },
            DbError::Conflict { entity } => FinshareError::AlreadyExists { entity },
            other => FinshareError::Database(other.to_string()),
        }
    }
}

use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Failures of the store itself. Expected absence and conflicts are not
/// errors; they are reported through [`super::Outcome`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("connection pool error: {0}")]
    ConnectionError(#[from] PoolError),
    #[error("database error: {0}")]
    DatabaseError(#[from] DieselError),
    #[error("stored value violates a domain constraint: {0}")]
    ValidationError(String),
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl RepositoryError {
    /// `true` when the store rejected a write because of a unique index or a
    /// foreign key.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            RepositoryError::DatabaseError(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::ForeignKeyViolation,
                _
            ))
        )
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
